//! Flux: the CatPaw client state engine.
//!
//! A path-addressed state store with pub/sub plus a request router. Rust
//! owns all client state and logic; a platform shell only renders what it
//! reads and emits what the user does.
//!
//! # Three Primitives
//!
//! - `get(path)`: read state at a path, Arc zero-copy
//! - `emit(path, payload)`: send a request, Trie-routed to handler(s)
//! - `subscribe(pattern)`: observe state changes, Trie-matched notifications
//!
//! # Path Addressing
//!
//! - Screens: `feed/state`, `inbox/state`, `story/view`
//! - Per-item: `profile/{user_id}`, `chat/{peer_id}`, `comments/{post_id}`
//! - Toggles: `posts/{id}/like`, `users/{id}/follow`, `events/{id}/join`
//!
//! Patterns accept MQTT-style wildcards: `posts/+/like`, `chat/#`, `#`.

pub mod app;
pub mod router;
pub mod store;
pub mod trie;
pub mod value;

pub use app::Flux;
pub use router::{BoxFuture, Router};
pub use store::{ChangeHandler, StateStore};
pub use value::{StateValue, SubscriptionId};
