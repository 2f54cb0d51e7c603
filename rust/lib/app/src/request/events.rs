//! Event requests.

use catpaw_client::NewEvent;

#[derive(Debug, Clone)]
pub struct EventsLoadReq;

impl EventsLoadReq {
    pub const PATH: &'static str = "events/load";
}

#[derive(Debug, Clone)]
pub struct CreateEventReq {
    pub event: NewEvent,
}

impl CreateEventReq {
    pub const PATH: &'static str = "event/create";
}

/// Toggle the viewer's participation.
#[derive(Debug, Clone)]
pub struct JoinEventReq {
    pub event_id: i64,
}

impl JoinEventReq {
    pub const PATH: &'static str = "event/join";
}
