//! CatPaw API client.
//!
//! Typed access to the CatPaw PHP backend. [`CatPawApi`] is the seam the
//! app layer depends on; [`HttpApi`] talks to the real server.
//!
//! # Usage
//!
//! ```ignore
//! use catpaw_client::{CatPawApi, HttpApi};
//!
//! let api = HttpApi::new("http://localhost/catpaw/api");
//! let user = api.login("tom@cat.io", "secret").await?;
//! let feed = api.feed(user.user_id).await?;
//! ```

pub mod api;
pub mod error;
pub mod http;
pub mod media;
pub mod types;

pub use api::CatPawApi;
pub use error::ApiError;
pub use http::HttpApi;
pub use media::MediaResolver;
pub use types::*;
