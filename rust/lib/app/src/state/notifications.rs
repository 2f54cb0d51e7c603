//! Notifications: `notifications/state`.

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationItem {
    pub notification_id: i64,
    pub kind: String,
    pub actor_username: String,
    pub actor_avatar: Option<String>,
    pub text: String,
    pub post_id: Option<i64>,
    pub read: bool,
    pub time_label: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationsState {
    pub items: Vec<NotificationItem>,
    pub unread: usize,
    pub loading: bool,
}

impl NotificationsState {
    pub const PATH: &'static str = "notifications/state";
}
