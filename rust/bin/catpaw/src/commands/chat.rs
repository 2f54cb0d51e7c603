//! Inbox and live conversations.

use std::time::Duration;

use anyhow::Result;
use catpaw_app::CatPawApp;
use catpaw_app::request::{ChatCloseReq, ChatOpenReq, ChatSendReq, InboxLoadReq};
use catpaw_app::state::{ChatMessage, ChatState, InboxState};
use tokio::sync::mpsc;

use super::wait_for;

const FIRST_ROUND: Duration = Duration::from_secs(10);

pub fn render_message(message: &ChatMessage, peer: &str) -> String {
    let who = if message.mine { "you" } else { peer };
    format!("{:>8} {:<12} {}", message.time_label, who, message.text)
}

fn print_new(state: &ChatState, shown: &mut usize, peer: &str) {
    for m in state.messages.iter().skip(*shown) {
        println!("{}", render_message(m, peer));
    }
    *shown = (*shown).max(state.messages.len());
}

pub async fn inbox(app: &CatPawApp) -> Result<()> {
    app.emit(InboxLoadReq::PATH, InboxLoadReq).await;
    let inbox = app.flux().get_as::<InboxState>(InboxState::PATH).unwrap_or_default();
    if inbox.conversations.is_empty() {
        println!("No conversations yet.");
    }
    for c in &inbox.conversations {
        println!("{:<6} @{:<16} {:<8} {}", c.peer_id, c.username, c.time_label, c.last_message);
    }
    Ok(())
}

/// Open the thread with `peer_id`, optionally send, optionally keep watching.
pub async fn open(
    app: &CatPawApp,
    peer_id: i64,
    send: Option<String>,
    watch: Option<Duration>,
) -> Result<()> {
    let path = ChatState::path(peer_id);
    let peer = format!("#{peer_id}");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sub = app.flux().subscribe(&path, move |_, value| {
        if let Some(state) = value.downcast_ref::<ChatState>() {
            let _ = tx.send(state.clone());
        }
    });

    app.emit(ChatOpenReq::PATH, ChatOpenReq { peer_id }).await;
    let first = wait_for::<ChatState, _>(app.flux(), &path, FIRST_ROUND, |s| !s.loading).await;
    let mut shown = 0;
    if let Some(state) = &first {
        for m in &state.messages {
            println!("{}", render_message(m, &peer));
        }
        shown = state.messages.len();
    }

    if let Some(text) = send {
        app.emit(ChatSendReq::PATH, ChatSendReq { peer_id, text }).await;
        if let Some(error) = app.flux().get_as::<ChatState>(&path).and_then(|s| s.error) {
            app.flux().unsubscribe(&path, sub);
            app.emit(ChatCloseReq::PATH, ChatCloseReq { peer_id }).await;
            anyhow::bail!(error);
        }
        // The send kicks the poll loop; wait for that round to land.
        wait_for::<ChatState, _>(app.flux(), &path, FIRST_ROUND, |s| s.messages.len() > shown).await;
    }

    while let Ok(state) = rx.try_recv() {
        print_new(&state, &mut shown, &peer);
    }
    if let Some(watch) = watch {
        let deadline = tokio::time::Instant::now() + watch;
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                _ = tokio::time::sleep_until(deadline) => break,
                state = rx.recv() => match state {
                    Some(state) => print_new(&state, &mut shown, &peer),
                    None => break,
                },
            }
        }
    }

    app.flux().unsubscribe(&path, sub);
    app.emit(ChatCloseReq::PATH, ChatCloseReq { peer_id }).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_messages_say_you() {
        let m = ChatMessage { message_id: 1, text: "hi".into(), mine: true, time_label: "2m".into() };
        assert_eq!(render_message(&m, "#8"), "      2m you          hi");
        let m = ChatMessage { mine: false, ..m };
        assert!(render_message(&m, "#8").contains("#8"));
    }
}
