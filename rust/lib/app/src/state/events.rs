//! Community events: `events/state`.

/// An event.
///
/// `participants_count` and `joined` are the values from the last fetch
/// and seed the toggle. A join does not update them; the live pair sits
/// at `events/{id}/join`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventItem {
    pub event_id: i64,
    pub creator_id: i64,
    pub creator_username: String,
    pub title: String,
    pub description: String,
    pub event_date: String,
    pub location: String,
    pub image_url: Option<String>,
    /// As fetched.
    pub participants_count: i64,
    /// As fetched.
    pub joined: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventsState {
    pub items: Vec<EventItem>,
    pub loading: bool,
    pub busy: bool,
    pub error: Option<String>,
}

impl EventsState {
    pub const PATH: &'static str = "events/state";
}
