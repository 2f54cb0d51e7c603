//! Wire contract with the CatPaw PHP backend.
//!
//! Field names are fixed by the backend and must not be renamed. Every
//! endpoint of the current contract lives here; there is no second,
//! legacy set.

pub mod adoption;
pub mod admin;
pub mod event;
pub mod forms;
pub mod lenient;
pub mod message;
pub mod notification;
pub mod post;
pub mod status;
pub mod story;
pub mod user;

pub use adoption::Adoption;
pub use admin::AdminStats;
pub use event::Event;
pub use forms::{ImageUpload, NewAdoption, NewEvent, NewPost, NewStory, ProfileUpdate};
pub use message::{Conversation, Message};
pub use notification::Notification;
pub use post::{Comment, Post};
pub use status::{Interaction, LoginResponse, StatusResponse};
pub use story::{Story, StoryOwner};
pub use user::{Profile, User};

/// Version of the request/response contract this crate speaks.
pub const API_SCHEMA_VERSION: u32 = 1;
