use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::trie::Trie;
use crate::value::{StateValue, SubscriptionId};

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

/// Per-path state store with Trie-based subscription routing.
///
/// - `set(path, value)` stores a value and notifies matching subscribers.
/// - `update(path, f)` does an atomic read-modify-write, then notifies.
/// - `get(path)` reads the current value (Arc clone, cheap).
/// - `scan(prefix)` lists all children under a prefix path.
/// - `clear()` drops every value; subscriptions survive.
///
/// Values live in a `BTreeMap` so prefix scans come out ordered.
pub struct StateStore {
    values: RwLock<BTreeMap<String, StateValue>>,
    handlers: Trie<HandlerEntry>,
    next_id: AtomicU64,
}

#[derive(Clone)]
struct HandlerEntry {
    id: SubscriptionId,
    handler: ChangeHandler,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            handlers: Trie::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Set a typed value at `path` and notify matching subscribers.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        self.set_value(path, StateValue::new(value));
    }

    /// Set a pre-built StateValue at `path` and notify matching subscribers.
    pub fn set_value(&self, path: &str, value: StateValue) {
        {
            let mut values = self.values.write().unwrap();
            values.insert(path.to_string(), value.clone());
        }
        self.notify(path, &value);
    }

    /// Atomically replace the value at `path` with `f(current)`.
    ///
    /// `f` sees `None` when the path is empty or holds another type. The
    /// write lock is held across read and write, so two concurrent updates
    /// never lose each other's change. Subscribers are notified after the
    /// lock is released. Returns the stored value.
    pub fn update<T, F>(&self, path: &str, f: F) -> T
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce(Option<&T>) -> T,
    {
        let (next, value) = {
            let mut values = self.values.write().unwrap();
            let next = f(values.get(path).and_then(|v| v.downcast_ref::<T>()));
            let value = StateValue::new(next.clone());
            values.insert(path.to_string(), value.clone());
            (next, value)
        };
        self.notify(path, &value);
        next
    }

    /// Like [`update`](Self::update) but `f` may decline to write by
    /// returning `None`. Nothing is notified in that case.
    pub fn update_if<T, F>(&self, path: &str, f: F) -> Option<T>
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce(Option<&T>) -> Option<T>,
    {
        let (next, value) = {
            let mut values = self.values.write().unwrap();
            let next = f(values.get(path).and_then(|v| v.downcast_ref::<T>()))?;
            let value = StateValue::new(next.clone());
            values.insert(path.to_string(), value.clone());
            (next, value)
        };
        self.notify(path, &value);
        Some(next)
    }

    pub fn get(&self, path: &str) -> Option<StateValue> {
        let values = self.values.read().unwrap();
        values.get(path).cloned()
    }

    /// Read and clone the typed value at `path`.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|v| v.cloned::<T>())
    }

    /// Remove the value at `path`. Does NOT notify subscribers.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        let mut values = self.values.write().unwrap();
        values.remove(path)
    }

    /// Remove `prefix` itself and everything under `{prefix}/`.
    ///
    /// Returns the number of removed entries. Does NOT notify.
    pub fn remove_prefix(&self, prefix: &str) -> usize {
        let mut values = self.values.write().unwrap();
        let child_prefix = format!("{}/", prefix);
        let before = values.len();
        values.retain(|k, _| k != prefix && !k.starts_with(&child_prefix));
        before - values.len()
    }

    /// Drop every stored value. Subscriptions are kept.
    pub fn clear(&self) {
        let mut values = self.values.write().unwrap();
        values.clear();
    }

    /// All entries whose path starts with `{prefix}/`, ordered by path.
    ///
    /// `scan("posts")` returns `posts/1/like`, `posts/1/save`, `posts/2/like` …
    /// but not `posts` itself.
    pub fn scan(&self, prefix: &str) -> Vec<(String, StateValue)> {
        let values = self.values.read().unwrap();
        let scan_prefix = format!("{}/", prefix);
        values
            .range(scan_prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&scan_prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        let values = self.values.read().unwrap();
        values.contains_key(path)
    }

    pub fn len(&self) -> usize {
        let values = self.values.read().unwrap();
        values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to changes on paths matching `pattern`.
    ///
    /// The handler runs synchronously on the thread that wrote the value.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.insert(
            pattern,
            HandlerEntry {
                id,
                handler: Arc::new(handler),
            },
        );
        id
    }

    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) {
        self.handlers.remove(pattern, |entry| entry.id == id);
    }

    /// All paths and values, ordered by path.
    pub fn snapshot(&self) -> Vec<(String, StateValue)> {
        let values = self.values.read().unwrap();
        values.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn notify(&self, path: &str, value: &StateValue) {
        for entry in self.handlers.match_path(path) {
            (entry.handler)(path, value);
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Toggle {
        active: bool,
        count: i64,
    }

    fn counter() -> (Arc<AtomicU64>, Arc<AtomicU64>) {
        let c = Arc::new(AtomicU64::new(0));
        (c.clone(), c)
    }

    // ========================================================================
    // get / set / remove
    // ========================================================================

    #[test]
    fn set_and_get_struct() {
        let store = StateStore::new();
        store.set("posts/1/like", Toggle { active: false, count: 4 });

        let v = store.get("posts/1/like").unwrap();
        assert_eq!(v.downcast_ref::<Toggle>().unwrap().count, 4);
        assert!(store.get("posts/2/like").is_none());
    }

    #[test]
    fn get_as_clones_typed_value() {
        let store = StateStore::new();
        store.set("app/route", "/home".to_string());

        assert_eq!(store.get_as::<String>("app/route"), Some("/home".into()));
        assert_eq!(store.get_as::<u32>("app/route"), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = StateStore::new();
        store.set("app/route", "/login".to_string());
        store.set("app/route", "/home".to_string());
        assert_eq!(store.get_as::<String>("app/route").unwrap(), "/home");
    }

    #[test]
    fn remove_returns_old_value_without_notifying() {
        let store = StateStore::new();
        let (seen, c) = counter();
        store.subscribe("#", move |_, _| {
            c.fetch_add(1, Ordering::Relaxed);
        });

        store.set("compose/state", 1u32);
        let old = store.remove("compose/state").unwrap();

        assert_eq!(old.downcast_ref::<u32>(), Some(&1));
        assert!(!store.contains("compose/state"));
        assert_eq!(seen.load(Ordering::Relaxed), 1);
    }

    // ========================================================================
    // update / update_if
    // ========================================================================

    #[test]
    fn update_sees_current_value() {
        let store = StateStore::new();
        store.set("posts/9/like", Toggle { active: false, count: 10 });

        let next = store.update("posts/9/like", |cur: Option<&Toggle>| {
            let cur = cur.cloned().unwrap();
            Toggle { active: !cur.active, count: cur.count + 1 }
        });

        assert_eq!(next, Toggle { active: true, count: 11 });
        assert_eq!(store.get_as::<Toggle>("posts/9/like"), Some(next));
    }

    #[test]
    fn update_on_missing_path_gets_none() {
        let store = StateStore::new();
        let next = store.update("unread", |cur: Option<&u32>| cur.copied().unwrap_or(0) + 1);
        assert_eq!(next, 1);
    }

    #[test]
    fn update_on_other_type_gets_none() {
        let store = StateStore::new();
        store.set("unread", "three".to_string());
        let next = store.update("unread", |cur: Option<&u32>| {
            assert!(cur.is_none());
            3
        });
        assert_eq!(next, 3);
    }

    #[test]
    fn update_notifies_after_write() {
        let store = Arc::new(StateStore::new());
        let reader = store.clone();
        let observed = Arc::new(Mutex::new(Vec::new()));
        let o = observed.clone();

        store.subscribe("counter", move |path, _| {
            // The lock is released before handlers run.
            let v = reader.get_as::<u32>(path).unwrap();
            o.lock().unwrap().push(v);
        });

        store.update("counter", |c: Option<&u32>| c.copied().unwrap_or(0) + 1);
        store.update("counter", |c: Option<&u32>| c.copied().unwrap_or(0) + 1);
        assert_eq!(*observed.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn update_if_can_decline() {
        let store = StateStore::new();
        let (seen, c) = counter();
        store.subscribe("chat/4", move |_, _| {
            c.fetch_add(1, Ordering::Relaxed);
        });
        store.set("chat/4", vec![1u32, 2]);

        let shorter = store.update_if("chat/4", |cur: Option<&Vec<u32>>| {
            let incoming = vec![1u32];
            (incoming.len() > cur.map_or(0, Vec::len)).then_some(incoming)
        });
        assert!(shorter.is_none());
        assert_eq!(store.get_as::<Vec<u32>>("chat/4").unwrap(), vec![1, 2]);

        let longer = store.update_if("chat/4", |cur: Option<&Vec<u32>>| {
            let incoming = vec![1u32, 2, 3];
            (incoming.len() > cur.map_or(0, Vec::len)).then_some(incoming)
        });
        assert_eq!(longer, Some(vec![1, 2, 3]));
        assert_eq!(seen.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn concurrent_updates_do_not_lose_writes() {
        use std::thread;

        let store = Arc::new(StateStore::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..250 {
                        store.update("count", |c: Option<&u64>| c.copied().unwrap_or(0) + 1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.get_as::<u64>("count"), Some(1000));
    }

    // ========================================================================
    // remove_prefix / clear
    // ========================================================================

    #[test]
    fn remove_prefix_drops_subtree_only() {
        let store = StateStore::new();
        store.set("chat", 0u32);
        store.set("chat/3", 1u32);
        store.set("chat/3/draft", 2u32);
        store.set("chatter", 3u32);

        assert_eq!(store.remove_prefix("chat"), 3);
        assert!(store.contains("chatter"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_keeps_subscriptions() {
        let store = StateStore::new();
        let (seen, c) = counter();
        store.subscribe("auth/state", move |_, _| {
            c.fetch_add(1, Ordering::Relaxed);
        });

        store.set("auth/state", 1u32);
        store.set("feed/state", 1u32);
        store.clear();
        assert!(store.is_empty());

        store.set("auth/state", 2u32);
        assert_eq!(seen.load(Ordering::Relaxed), 2);
    }

    // ========================================================================
    // scan / snapshot
    // ========================================================================

    #[test]
    fn scan_returns_ordered_children() {
        let store = StateStore::new();
        store.set("posts/2/like", 1u32);
        store.set("posts/1/save", 2u32);
        store.set("posts/1/like", 3u32);
        store.set("posts", 0u32);
        store.set("postsx/1", 0u32);

        let paths: Vec<String> = store.scan("posts").into_iter().map(|(k, _)| k).collect();
        assert_eq!(paths, vec!["posts/1/like", "posts/1/save", "posts/2/like"]);
    }

    #[test]
    fn snapshot_returns_all_entries() {
        let store = StateStore::new();
        store.set("b", 1u32);
        store.set("a", 2u32);
        let paths: Vec<String> = store.snapshot().into_iter().map(|(k, _)| k).collect();
        assert_eq!(paths, vec!["a", "b"]);
    }

    // ========================================================================
    // subscribe / unsubscribe
    // ========================================================================

    #[test]
    fn wildcard_subscription_sees_every_toggle() {
        let store = StateStore::new();
        let paths = Arc::new(Mutex::new(Vec::<String>::new()));
        let p = paths.clone();
        store.subscribe("posts/+/like", move |path, _| {
            p.lock().unwrap().push(path.to_string());
        });

        store.set("posts/1/like", Toggle { active: true, count: 1 });
        store.set("posts/2/like", Toggle { active: true, count: 1 });
        store.set("posts/2/save", Toggle { active: true, count: 0 });

        assert_eq!(*paths.lock().unwrap(), vec!["posts/1/like", "posts/2/like"]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = StateStore::new();
        let (seen, c) = counter();
        let id = store.subscribe("feed/state", move |_, _| {
            c.fetch_add(1, Ordering::Relaxed);
        });

        store.set("feed/state", 1u32);
        store.unsubscribe("feed/state", id);
        store.set("feed/state", 2u32);
        assert_eq!(seen.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn subscription_ids_are_unique() {
        let store = StateStore::new();
        let a = store.subscribe("a", |_, _| {});
        let b = store.subscribe("a", |_, _| {});
        assert_ne!(a, b);
    }
}
