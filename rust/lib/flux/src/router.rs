use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::store::StateStore;
use crate::trie::Trie;

/// A boxed, `Send`-able future returned by request handlers.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Type-erased handler stored in the router.
///
/// Takes owned values so the returned future can be `'static`:
/// the matched request path, the payload, and the state store.
type ErasedHandler =
    Arc<dyn Fn(String, Arc<dyn Any + Send + Sync>, Arc<StateStore>) -> BoxFuture + Send + Sync>;

/// Request router: maps path patterns to async handlers via Trie matching.
///
/// Several handlers may match one path (through wildcards); they run
/// sequentially in match order.
pub struct Router {
    trie: Trie<ErasedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self { trie: Trie::new() }
    }

    /// Register an async handler for a path pattern (`+`/`#` allowed).
    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(String, Arc<dyn Any + Send + Sync>, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: ErasedHandler = Arc::new(
            move |path: String,
                  payload: Arc<dyn Any + Send + Sync>,
                  store: Arc<StateStore>|
                  -> BoxFuture { Box::pin(handler(path, payload, store)) },
        );
        self.trie.insert(pattern, handler);
    }

    /// Run every handler matching `path`. No match is a silent no-op.
    pub async fn dispatch(
        &self,
        path: &str,
        payload: Arc<dyn Any + Send + Sync>,
        store: Arc<StateStore>,
    ) {
        for handler in self.trie.match_path(path) {
            handler(path.to_string(), Arc::clone(&payload), Arc::clone(&store)).await;
        }
    }

    /// Whether any handler would match `path`.
    pub fn matches(&self, path: &str) -> bool {
        !self.trie.match_path(path).is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
