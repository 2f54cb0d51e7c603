//! Post requests.

use catpaw_client::ImageUpload;

#[derive(Debug, Clone)]
pub struct FeedLoadReq;

impl FeedLoadReq {
    pub const PATH: &'static str = "feed/load";
}

/// Toggle the viewer's like on a post.
#[derive(Debug, Clone)]
pub struct LikePostReq {
    pub post_id: i64,
}

impl LikePostReq {
    pub const PATH: &'static str = "post/like";
}

/// Toggle the viewer's bookmark on a post.
#[derive(Debug, Clone)]
pub struct SavePostReq {
    pub post_id: i64,
}

impl SavePostReq {
    pub const PATH: &'static str = "post/save";
}

#[derive(Debug, Clone)]
pub struct CreatePostReq {
    pub caption: String,
    pub image: ImageUpload,
}

impl CreatePostReq {
    pub const PATH: &'static str = "post/create";
}

/// Delete one of the viewer's own posts.
#[derive(Debug, Clone)]
pub struct DeletePostReq {
    pub post_id: i64,
}

impl DeletePostReq {
    pub const PATH: &'static str = "post/delete";
}

#[derive(Debug, Clone)]
pub struct SavedLoadReq;

impl SavedLoadReq {
    pub const PATH: &'static str = "saved/load";
}
