//! Inbox and open chats.

use std::sync::Arc;

use catpaw_flux::StateStore;
use chrono::Utc;
use tracing::{debug, info, warn};

use super::convert::time_label;
use super::{CatPawContext, signed_in, still_current};
use crate::poller::ChatPoller;
use crate::request::*;
use crate::state::*;

/// Handle `inbox/load`.
pub async fn handle_inbox_load(_req: InboxLoadReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, InboxState::PATH) else {
        return;
    };
    store.update::<InboxState, _>(InboxState::PATH, |s| InboxState {
        loading: true,
        ..s.cloned().unwrap_or_default()
    });

    let result = ctx.api.conversations(session.user_id).await;
    if !still_current(&ctx, &session, "inbox") {
        return;
    }
    let now = Utc::now();
    let conversations = match result {
        Ok(rows) => Some(
            rows.iter()
                .map(|c| ConversationItem {
                    peer_id: c.other_user_id,
                    username: c.username.clone(),
                    avatar: ctx.media.resolve(c.profile_pic.as_deref()),
                    last_message: c.last_message.clone().unwrap_or_default(),
                    time_label: time_label(c.last_message_time.as_deref(), now),
                })
                .collect(),
        ),
        Err(e) => {
            warn!("inbox load failed: {e}");
            None
        }
    };
    store.update::<InboxState, _>(InboxState::PATH, |s| {
        let current = s.cloned().unwrap_or_default();
        InboxState {
            conversations: conversations.unwrap_or(current.conversations),
            loading: false,
        }
    });
}

/// Handle `chat/open`: show the thread and start polling it.
pub async fn handle_open(req: ChatOpenReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, ChatOpenReq::PATH) else {
        return;
    };
    store.set(&ChatState::path(req.peer_id), ChatState::opening(req.peer_id));

    let handle = ChatPoller::new(
        Arc::clone(&ctx.api),
        Arc::clone(&store),
        session.user_id,
        req.peer_id,
        ctx.config.chat_poll_interval(),
    )
    .spawn();
    if ctx.chats.lock().unwrap().insert(req.peer_id, handle).is_some() {
        debug!(peer = req.peer_id, "chat reopened, previous poller replaced");
    }
}

fn set_sending(store: &StateStore, peer_id: i64, sending: bool, error: Option<String>) {
    store.update::<ChatState, _>(&ChatState::path(peer_id), |s| ChatState {
        sending,
        error,
        ..s.cloned().unwrap_or_else(|| ChatState { loading: false, ..ChatState::opening(peer_id) })
    });
}

/// Handle `chat/send`. Blank messages are ignored.
///
/// A successful send kicks the open chat's poll loop once, so the refresh
/// stops with the loop on close or logout.
pub async fn handle_send(req: ChatSendReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, ChatSendReq::PATH) else {
        return;
    };
    let text = req.text.trim();
    if text.is_empty() {
        return;
    }
    set_sending(&store, req.peer_id, true, None);

    let result = ctx.api.send_message(session.user_id, req.peer_id, text).await;
    if !still_current(&ctx, &session, "sent message") {
        return;
    }
    match result {
        Ok(()) => {
            info!(peer = req.peer_id, "message sent");
            set_sending(&store, req.peer_id, false, None);
            // Show the new message without waiting for the timer.
            match ctx.chats.lock().unwrap().get(&req.peer_id) {
                Some(handle) => handle.poll_now(),
                None => debug!(peer = req.peer_id, "chat not open, no refresh"),
            }
        }
        Err(e) => {
            warn!(peer = req.peer_id, "send failed: {e}");
            set_sending(&store, req.peer_id, false, Some(e.user_message()));
        }
    }
}

/// Handle `chat/close`: stop polling and drop the thread.
pub async fn handle_close(req: ChatCloseReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let handle = ctx.chats.lock().unwrap().remove(&req.peer_id);
    if handle.is_some() {
        debug!(peer = req.peer_id, "chat closed");
    }
    drop(handle);
    store.remove(&ChatState::path(req.peer_id));
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::handlers::test_support::harness;
    use crate::testing::{Call, fixtures};
    use catpaw_client::Conversation;

    fn polls(c: &Call) -> bool {
        matches!(c, Call::Messages { user_id: 1, other_user_id: 2 })
    }

    #[tokio::test]
    async fn inbox_lists_conversations() {
        let h = harness();
        h.api.conversations.lock().unwrap().push(Conversation {
            other_user_id: 2,
            username: "root".into(),
            profile_pic: None,
            last_message: Some("see you".into()),
            last_message_time: None,
        });
        h.login_as_tom().await;

        h.flux.emit(InboxLoadReq::PATH, InboxLoadReq).await;
        let inbox = h.flux.get_as::<InboxState>(InboxState::PATH).unwrap();
        assert_eq!(inbox.conversations.len(), 1);
        assert_eq!(inbox.conversations[0].peer_id, 2);
        assert_eq!(inbox.conversations[0].last_message, "see you");
    }

    #[tokio::test(start_paused = true)]
    async fn open_polls_until_closed() {
        let h = harness();
        h.api.messages.lock().unwrap().push(fixtures::message(1, 2, 1, "meow?"));
        h.login_as_tom().await;

        h.flux.emit(ChatOpenReq::PATH, ChatOpenReq { peer_id: 2 }).await;
        assert_eq!(h.ctx.open_chats(), vec![2]);
        h.api.wait_for(1, polls).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        let chat = h.flux.get_as::<ChatState>("chat/2").unwrap();
        assert_eq!(chat.messages.len(), 1);
        assert!(!chat.loading);

        tokio::time::sleep(Duration::from_millis(4100)).await;
        assert_eq!(h.api.count(polls), 3);

        h.flux.emit(ChatCloseReq::PATH, ChatCloseReq { peer_id: 2 }).await;
        assert!(h.ctx.open_chats().is_empty());
        assert!(!h.flux.contains("chat/2"));
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(h.api.count(polls), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn send_shows_message_right_away() {
        let h = harness();
        h.login_as_tom().await;
        h.flux.emit(ChatOpenReq::PATH, ChatOpenReq { peer_id: 2 }).await;
        h.api.wait_for(1, polls).await;
        tokio::task::yield_now().await;

        h.flux
            .emit(ChatSendReq::PATH, ChatSendReq { peer_id: 2, text: " hello ".into() })
            .await;
        assert!(h.api.calls().contains(&Call::SendMessage {
            sender_id: 1,
            receiver_id: 2,
            text: "hello".into(),
        }));

        // The open chat's loop runs one extra round long before its 2s timer.
        h.api.wait_for(2, polls).await;
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(h.api.count(polls), 2);
        let chat = h.flux.get_as::<ChatState>("chat/2").unwrap();
        assert_eq!(chat.messages.len(), 1);
        assert!(chat.messages[0].mine);
        assert_eq!(chat.scroll_to, Some(0));
        assert!(!chat.sending);
    }

    #[tokio::test]
    async fn send_without_open_chat_does_not_fetch() {
        let h = harness();
        h.login_as_tom().await;

        h.flux
            .emit(ChatSendReq::PATH, ChatSendReq { peer_id: 2, text: "hi".into() })
            .await;
        assert_eq!(h.api.count(|c| matches!(c, Call::SendMessage { .. })), 1);
        assert_eq!(h.api.count(polls), 0);
        let chat = h.flux.get_as::<ChatState>("chat/2").unwrap();
        assert!(chat.messages.is_empty());
        assert!(!chat.sending);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_after_send_is_dropped_on_logout() {
        let h = harness();
        h.login_as_tom().await;
        h.flux.emit(ChatOpenReq::PATH, ChatOpenReq { peer_id: 2 }).await;
        h.api.wait_for(1, polls).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        h.api.hold("messages");
        h.flux
            .emit(ChatSendReq::PATH, ChatSendReq { peer_id: 2, text: "hello".into() })
            .await;
        h.api.wait_for(2, polls).await;

        h.flux.emit(LogoutReq::PATH, LogoutReq).await;
        h.api.release("messages");
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(h.ctx.open_chats().is_empty());
        assert!(!h.flux.contains("chat/2"));
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(h.api.count(polls), 2);
        assert!(!h.flux.contains("chat/2"));
    }

    #[tokio::test]
    async fn failed_send_keeps_thread_and_reports() {
        let h = harness();
        h.login_as_tom().await;
        h.api.fail("send_message");

        h.flux
            .emit(ChatSendReq::PATH, ChatSendReq { peer_id: 2, text: "hi".into() })
            .await;
        let chat = h.flux.get_as::<ChatState>("chat/2").unwrap();
        assert!(!chat.sending);
        assert_eq!(chat.error.as_deref(), Some("send_message failed"));
        assert!(chat.messages.is_empty());
    }

    #[tokio::test]
    async fn blank_message_is_not_sent() {
        let h = harness();
        h.login_as_tom().await;
        h.flux
            .emit(ChatSendReq::PATH, ChatSendReq { peer_id: 2, text: "\n".into() })
            .await;
        assert_eq!(h.api.count(|c| matches!(c, Call::SendMessage { .. })), 0);
    }
}
