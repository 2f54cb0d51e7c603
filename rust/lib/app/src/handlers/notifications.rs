//! Notification list.

use std::sync::Arc;

use catpaw_client::Notification;
use catpaw_flux::StateStore;
use chrono::Utc;
use tracing::warn;

use super::convert::time_label;
use super::{CatPawContext, signed_in, still_current};
use crate::request::*;
use crate::state::*;

fn notification_item(n: &Notification, ctx: &CatPawContext) -> NotificationItem {
    let actor = n.actor_username.clone().unwrap_or_default();
    let text = n.message.clone().unwrap_or_else(|| match n.kind.as_str() {
        "like" => "liked your post".into(),
        "comment" => "commented on your post".into(),
        "follow" => "started following you".into(),
        "message" => "sent you a message".into(),
        _ => String::new(),
    });
    NotificationItem {
        notification_id: n.notification_id,
        kind: n.kind.clone(),
        actor_username: actor,
        actor_avatar: ctx.media.resolve(n.actor_profile_pic.as_deref()),
        text,
        post_id: n.post_id,
        read: n.is_read,
        time_label: time_label(n.created_at.as_deref(), Utc::now()),
    }
}

/// Handle `notifications/load`.
pub async fn handle_load(_req: NotificationsLoadReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, NotificationsState::PATH) else {
        return;
    };
    store.update::<NotificationsState, _>(NotificationsState::PATH, |s| NotificationsState {
        loading: true,
        ..s.cloned().unwrap_or_default()
    });

    let result = ctx.api.notifications(session.user_id).await;
    if !still_current(&ctx, &session, "notifications") {
        return;
    }
    match result {
        Ok(rows) => {
            let items: Vec<NotificationItem> =
                rows.iter().map(|n| notification_item(n, &ctx)).collect();
            let unread = items.iter().filter(|n| !n.read).count();
            store.set(NotificationsState::PATH, NotificationsState { items, unread, loading: false });
        }
        Err(e) => {
            warn!("notifications load failed: {e}");
            store.update::<NotificationsState, _>(NotificationsState::PATH, |s| NotificationsState {
                loading: false,
                ..s.cloned().unwrap_or_default()
            });
        }
    }
}

/// Handle `notifications/mark-read`.
pub async fn handle_mark_read(
    _req: MarkNotificationsReadReq,
    store: Arc<StateStore>,
    ctx: Arc<CatPawContext>,
) {
    let Some(session) = signed_in(&ctx, MarkNotificationsReadReq::PATH) else {
        return;
    };
    let result = ctx.api.mark_notifications_read(session.user_id).await;
    if !still_current(&ctx, &session, "mark read") {
        return;
    }
    if let Err(e) = result {
        warn!("mark notifications read failed: {e}");
        return;
    }
    store.update::<NotificationsState, _>(NotificationsState::PATH, |s| {
        let mut next = s.cloned().unwrap_or_default();
        for item in &mut next.items {
            item.read = true;
        }
        next.unread = 0;
        next
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::harness;
    use crate::testing::{Call, fixtures};

    #[tokio::test]
    async fn load_counts_unread_and_mark_read_clears() {
        let h = harness();
        {
            let mut rows = h.api.notifications.lock().unwrap();
            rows.push(fixtures::notification(1, 1, false));
            rows.push(fixtures::notification(2, 1, true));
            rows.push(fixtures::notification(3, 1, false));
        }
        h.login_as_tom().await;

        h.flux.emit(NotificationsLoadReq::PATH, NotificationsLoadReq).await;
        let state = h.flux.get_as::<NotificationsState>(NotificationsState::PATH).unwrap();
        assert_eq!(state.items.len(), 3);
        assert_eq!(state.unread, 2);
        assert_eq!(state.items[0].actor_username, "user2");

        h.flux.emit(MarkNotificationsReadReq::PATH, MarkNotificationsReadReq).await;
        assert!(h.api.calls().contains(&Call::MarkNotificationsRead(1)));
        let state = h.flux.get_as::<NotificationsState>(NotificationsState::PATH).unwrap();
        assert_eq!(state.unread, 0);
        assert!(state.items.iter().all(|n| n.read));
    }

    #[tokio::test]
    async fn failed_mark_read_keeps_counts() {
        let h = harness();
        h.api.notifications.lock().unwrap().push(fixtures::notification(1, 1, false));
        h.login_as_tom().await;
        h.flux.emit(NotificationsLoadReq::PATH, NotificationsLoadReq).await;

        h.api.fail("mark_notifications_read");
        h.flux.emit(MarkNotificationsReadReq::PATH, MarkNotificationsReadReq).await;
        let state = h.flux.get_as::<NotificationsState>(NotificationsState::PATH).unwrap();
        assert_eq!(state.unread, 1);
    }

    #[tokio::test]
    async fn missing_message_falls_back_to_kind() {
        let ctx = harness().ctx;
        let mut n = fixtures::notification(1, 1, false);
        n.message = None;
        n.kind = "follow".into();
        assert_eq!(notification_item(&n, &ctx).text, "started following you");
    }
}
