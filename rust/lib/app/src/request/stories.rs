//! Story requests.

use catpaw_client::ImageUpload;

#[derive(Debug, Clone)]
pub struct StoriesLoadReq;

impl StoriesLoadReq {
    pub const PATH: &'static str = "stories/load";
}

#[derive(Debug, Clone)]
pub struct StoryUploadReq {
    pub image: ImageUpload,
}

impl StoryUploadReq {
    pub const PATH: &'static str = "story/upload";
}

/// Open the viewer on one user's stories.
#[derive(Debug, Clone)]
pub struct StoryOpenReq {
    pub user_id: i64,
}

impl StoryOpenReq {
    pub const PATH: &'static str = "story/open";
}

/// Pointer down anywhere in the viewer.
#[derive(Debug, Clone)]
pub struct StoryPressReq;

impl StoryPressReq {
    pub const PATH: &'static str = "story/press";
}

#[derive(Debug, Clone)]
pub struct StoryReleaseReq;

impl StoryReleaseReq {
    pub const PATH: &'static str = "story/release";
}

/// Tap at horizontal position `x` of a view `width` wide.
#[derive(Debug, Clone)]
pub struct StoryTapReq {
    pub x: f32,
    pub width: f32,
}

impl StoryTapReq {
    pub const PATH: &'static str = "story/tap";
}

#[derive(Debug, Clone)]
pub struct StoryCloseReq;

impl StoryCloseReq {
    pub const PATH: &'static str = "story/close";
}
