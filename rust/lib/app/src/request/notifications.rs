//! Notification requests.

#[derive(Debug, Clone)]
pub struct NotificationsLoadReq;

impl NotificationsLoadReq {
    pub const PATH: &'static str = "notifications/load";
}

#[derive(Debug, Clone)]
pub struct MarkNotificationsReadReq;

impl MarkNotificationsReadReq {
    pub const PATH: &'static str = "notifications/mark-read";
}
