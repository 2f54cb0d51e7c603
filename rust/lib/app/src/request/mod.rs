//! Request definitions.
//!
//! Each request is a plain struct with the path it is emitted on.

pub mod admin;
pub mod app;
pub mod auth;
pub mod chat;
pub mod comments;
pub mod events;
pub mod feed;
pub mod listings;
pub mod notifications;
pub mod profile;
pub mod stories;

pub use admin::{AdminDeletePostReq, AdminDeleteUserReq, AdminLoadReq};
pub use app::InitializeReq;
pub use auth::{LoginReq, LogoutReq, SignupReq};
pub use chat::{ChatCloseReq, ChatOpenReq, ChatSendReq, InboxLoadReq};
pub use comments::{AddCommentReq, CommentsLoadReq, DeleteCommentReq};
pub use events::{CreateEventReq, EventsLoadReq, JoinEventReq};
pub use feed::{CreatePostReq, DeletePostReq, FeedLoadReq, LikePostReq, SavePostReq, SavedLoadReq};
pub use listings::{AdoptionsLoadReq, CreateAdoptionReq, MarkAdoptedReq};
pub use notifications::{MarkNotificationsReadReq, NotificationsLoadReq};
pub use profile::{FollowUserReq, ProfileLoadReq, ProfileUpdateReq, SearchUsersReq};
pub use stories::{
    StoriesLoadReq, StoryCloseReq, StoryOpenReq, StoryPressReq, StoryReleaseReq, StoryTapReq,
    StoryUploadReq,
};
