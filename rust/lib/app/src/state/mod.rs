//! Screen state definitions.
//!
//! Each type lives at a well-known path in the state store. Per-item
//! screens (`profile/{id}`, `chat/{peer}`, `comments/{post}`) expose a
//! `path(id)` function instead of a `PATH` const.

pub mod admin;
pub mod app;
pub mod auth;
pub mod chat;
pub mod comments;
pub mod compose;
pub mod events;
pub mod feed;
pub mod listings;
pub mod notifications;
pub mod profile;
pub mod search;
pub mod stories;

pub use admin::AdminState;
pub use app::{AppMenu, AppRoute, MenuEntry};
pub use auth::{AuthPhase, AuthState, SignupState, UserSummary};
pub use chat::{ChatMessage, ChatState, ConversationItem, InboxState};
pub use comments::{CommentItem, CommentsState};
pub use compose::ComposeState;
pub use events::{EventItem, EventsState};
pub use feed::{FeedState, PostItem, SavedState};
pub use listings::{AdoptionItem, AdoptionsState};
pub use notifications::{NotificationItem, NotificationsState};
pub use profile::{ProfileState, ProfileView};
pub use search::SearchState;
pub use stories::{StoryItem, StoryOwnerItem, StoryTray, StoryView};

pub use crate::optimistic::ToggleState;
