//! Optimistic toggles for reversible viewer actions.
//!
//! A toggle flips the `(active, count)` pair in the store before anything
//! is sent, then fires the mutation in the background. What happens when
//! the mutation fails is up to the installed [`ReconcilePolicy`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use catpaw_client::{ApiError, CatPawApi, Interaction};
use catpaw_flux::StateStore;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A reversible flag with its public counter (likes, followers, participants).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleState {
    pub active: bool,
    pub count: i64,
}

impl ToggleState {
    pub fn new(active: bool, count: i64) -> Self {
        Self { active, count }
    }

    /// Flip the flag and move the counter with it.
    pub fn toggled(self) -> Self {
        if self.active {
            Self { active: false, count: self.count - 1 }
        } else {
            Self { active: true, count: self.count + 1 }
        }
    }
}

/// Store path of the toggle for `kind` on `target_id`.
pub fn toggle_path(kind: Interaction, target_id: i64) -> String {
    match kind {
        Interaction::Like => format!("posts/{target_id}/like"),
        Interaction::Save => format!("posts/{target_id}/save"),
        Interaction::Follow => format!("users/{target_id}/follow"),
        Interaction::EventJoin => format!("events/{target_id}/join"),
    }
}

/// A toggle whose mutation came back with an error.
#[derive(Debug)]
pub struct ToggleFailure<'a> {
    pub kind: Interaction,
    pub target_id: i64,
    pub path: &'a str,
    /// State before this toggle.
    pub previous: ToggleState,
    /// State this toggle wrote.
    pub applied: ToggleState,
    /// A newer toggle on the same path happened after this one.
    pub superseded: bool,
    pub error: &'a ApiError,
}

/// Decides what a failed mutation does to local state.
pub trait ReconcilePolicy: Send + Sync + 'static {
    fn on_failure(&self, store: &StateStore, failure: &ToggleFailure<'_>);
}

/// Leave the optimistic state in place. Local and server state may diverge
/// until the next full fetch.
pub struct KeepLocal;

impl ReconcilePolicy for KeepLocal {
    fn on_failure(&self, _store: &StateStore, failure: &ToggleFailure<'_>) {
        debug!(path = failure.path, "toggle failed, keeping local state");
    }
}

/// Restore the pre-toggle state, unless the user has toggled again since.
pub struct RollbackOnFailure;

impl ReconcilePolicy for RollbackOnFailure {
    fn on_failure(&self, store: &StateStore, failure: &ToggleFailure<'_>) {
        if failure.superseded {
            return;
        }
        let previous = failure.previous;
        let applied = failure.applied;
        let rolled_back = store.update_if::<ToggleState, _>(failure.path, |current| {
            (current == Some(&applied)).then_some(previous)
        });
        if rolled_back.is_some() {
            debug!(path = failure.path, "toggle rolled back");
        }
    }
}

/// Applies toggles locally and sends their mutations.
pub struct OptimisticToggler {
    api: Arc<dyn CatPawApi>,
    policy: Arc<dyn ReconcilePolicy>,
    /// Per-path toggle counter; tells a stale failure from the latest one.
    versions: Arc<Mutex<HashMap<String, u64>>>,
    in_flight: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl OptimisticToggler {
    pub fn new(api: Arc<dyn CatPawApi>, policy: Arc<dyn ReconcilePolicy>) -> Self {
        Self {
            api,
            policy,
            versions: Arc::new(Mutex::new(HashMap::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            idle: Arc::new(Notify::new()),
        }
    }

    /// Seed the toggle for `kind` on `target_id` from fetched data.
    pub fn seed(&self, store: &StateStore, kind: Interaction, target_id: i64, state: ToggleState) {
        store.set(&toggle_path(kind, target_id), state);
    }

    /// Flip the toggle now and send the mutation in the background.
    ///
    /// The store holds the new state when this returns. Each call sends
    /// exactly one request carrying the flag as of this toggle. The handle
    /// resolves with the mutation's outcome; dropping it detaches the task.
    pub fn toggle(
        &self,
        store: &Arc<StateStore>,
        kind: Interaction,
        actor_id: i64,
        target_id: i64,
    ) -> JoinHandle<Result<(), ApiError>> {
        let path = toggle_path(kind, target_id);
        let (previous, applied, version) = {
            let mut versions = self.versions.lock().unwrap();
            let mut previous = ToggleState::default();
            let applied = store.update::<ToggleState, _>(&path, |current| {
                previous = current.copied().unwrap_or_default();
                previous.toggled()
            });
            let version = versions.entry(path.clone()).or_insert(0);
            *version += 1;
            (previous, applied, *version)
        };
        debug!(%path, active = applied.active, count = applied.count, "toggle");

        let api = Arc::clone(&self.api);
        let policy = Arc::clone(&self.policy);
        let versions = Arc::clone(&self.versions);
        let store = Arc::clone(store);
        let in_flight = Arc::clone(&self.in_flight);
        let idle = Arc::clone(&self.idle);
        in_flight.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(async move {
            let result = api.interact(kind, actor_id, target_id, applied.active).await;
            if let Err(error) = &result {
                warn!(%path, "toggle mutation failed: {error}");
                let versions = versions.lock().unwrap();
                let failure = ToggleFailure {
                    kind,
                    target_id,
                    path: &path,
                    previous,
                    applied,
                    superseded: versions.get(&path) != Some(&version),
                    error,
                };
                policy.on_failure(&store, &failure);
            }
            if in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                idle.notify_waiters();
            }
            result
        })
    }

    /// Number of mutations still waiting for the server.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Wait until every sent mutation has completed.
    pub async fn settle(&self) {
        loop {
            let idle = self.idle.notified();
            if self.in_flight() == 0 {
                return;
            }
            idle.await;
        }
    }

    /// Forget toggle history. In-flight failures become superseded.
    pub fn reset(&self) {
        self.versions.lock().unwrap().clear();
    }
}
