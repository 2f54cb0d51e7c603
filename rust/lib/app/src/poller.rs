//! Fixed-interval chat polling.
//!
//! One loop per open chat. Each round fetches the whole thread and keeps it
//! only when it is strictly longer than what is shown. The loop lives as
//! long as its [`PollHandle`].

use std::sync::Arc;
use std::time::Duration;

use catpaw_client::{CatPawApi, Message};
use catpaw_flux::StateStore;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::state::{ChatMessage, ChatState};
use crate::timefmt;

/// Owns a running poll loop. Dropping it stops the loop.
pub struct PollHandle {
    cancel: CancellationToken,
    kick: Arc<Notify>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Run one round now instead of waiting for the timer.
    pub fn poll_now(&self) {
        self.kick.notify_one();
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Polls the thread between the viewer and one peer into `chat/{peer_id}`.
pub struct ChatPoller {
    api: Arc<dyn CatPawApi>,
    store: Arc<StateStore>,
    viewer_id: i64,
    peer_id: i64,
    interval: Duration,
    cancel: CancellationToken,
}

impl ChatPoller {
    pub fn new(
        api: Arc<dyn CatPawApi>,
        store: Arc<StateStore>,
        viewer_id: i64,
        peer_id: i64,
        interval: Duration,
    ) -> Self {
        Self { api, store, viewer_id, peer_id, interval, cancel: CancellationToken::new() }
    }

    /// Start the loop. The first round runs immediately.
    pub fn spawn(self) -> PollHandle {
        let cancel = self.cancel.clone();
        let kick = Arc::new(Notify::new());

        let task = {
            let cancel = cancel.clone();
            let kick = Arc::clone(&kick);
            tokio::spawn(async move {
                info!(peer = self.peer_id, "chat poller started (interval={:?})", self.interval);
                loop {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        _ = self.poll_once() => {}
                    }
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        _ = kick.notified() => debug!(peer = self.peer_id, "forced poll"),
                        _ = tokio::time::sleep(self.interval) => {}
                    }
                }
                info!(peer = self.peer_id, "chat poller stopped");
            })
        };

        PollHandle { cancel, kick, task }
    }

    /// One fetch-and-merge round. Returns whether the thread was replaced.
    ///
    /// Failures are swallowed; the next round simply tries again. A round
    /// that lands after the poller was cancelled writes nothing.
    pub async fn poll_once(&self) -> bool {
        let path = ChatState::path(self.peer_id);
        let fetched = self.api.messages(self.viewer_id, self.peer_id).await;
        if self.cancel.is_cancelled() {
            debug!(peer = self.peer_id, "chat poll finished after close, dropped");
            return false;
        }
        match fetched {
            Ok(fetched) => {
                let fetched = to_items(self.viewer_id, fetched);
                self.store
                    .update_if::<ChatState, _>(&path, |current| {
                        merge_thread(current, self.peer_id, fetched)
                    })
                    .is_some_and(|s| s.scroll_to.is_some())
            }
            Err(e) => {
                debug!(peer = self.peer_id, "chat poll failed: {e}");
                self.store.update_if::<ChatState, _>(&path, |current| {
                    let current = current?;
                    current.loading.then(|| ChatState { loading: false, ..current.clone() })
                });
                false
            }
        }
    }
}

fn to_items(viewer_id: i64, messages: Vec<Message>) -> Vec<ChatMessage> {
    let now = chrono::Utc::now();
    messages
        .into_iter()
        .map(|m| ChatMessage {
            message_id: m.message_id,
            mine: m.sender_id == viewer_id,
            time_label: m
                .created_at
                .as_deref()
                .map(|t| timefmt::relative_label(t, now))
                .unwrap_or_default(),
            text: m.message_text,
        })
        .collect()
}

/// Merge a fetched thread into the shown one.
///
/// Replaces only when `fetched` is strictly longer, pointing the scroll
/// anchor at the new tail. A first round that adds nothing still clears
/// the loading flag. `None` means leave the store untouched.
pub fn merge_thread(
    current: Option<&ChatState>,
    peer_id: i64,
    fetched: Vec<ChatMessage>,
) -> Option<ChatState> {
    let held = current.map_or(0, |c| c.messages.len());
    if fetched.len() > held {
        let tail = fetched.len() - 1;
        let base = current.cloned().unwrap_or_else(|| ChatState::opening(peer_id));
        return Some(ChatState {
            messages: fetched,
            scroll_to: Some(tail),
            loading: false,
            ..base
        });
    }
    match current {
        Some(c) if c.loading => Some(ChatState { loading: false, ..c.clone() }),
        _ => None,
    }
}
