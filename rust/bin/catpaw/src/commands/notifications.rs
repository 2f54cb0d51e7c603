//! Notifications.

use anyhow::Result;
use catpaw_app::CatPawApp;
use catpaw_app::request::{MarkNotificationsReadReq, NotificationsLoadReq};
use catpaw_app::state::{NotificationItem, NotificationsState};

pub fn render_notification(item: &NotificationItem) -> String {
    format!(
        "{} {:<8} @{} {}",
        if item.read { ' ' } else { '•' },
        item.time_label,
        item.actor_username,
        item.text,
    )
}

pub async fn list(app: &CatPawApp, mark_read: bool) -> Result<()> {
    app.emit(NotificationsLoadReq::PATH, NotificationsLoadReq).await;
    let state = app
        .flux()
        .get_as::<NotificationsState>(NotificationsState::PATH)
        .unwrap_or_default();
    println!("{} unread", state.unread);
    for item in &state.items {
        println!("{}", render_notification(item));
    }

    if mark_read && state.unread > 0 {
        app.emit(MarkNotificationsReadReq::PATH, MarkNotificationsReadReq).await;
        let after = app
            .flux()
            .get_as::<NotificationsState>(NotificationsState::PATH)
            .unwrap_or_default();
        if after.unread > 0 {
            anyhow::bail!("could not mark notifications as read");
        }
        println!("Marked all as read.");
    }
    Ok(())
}
