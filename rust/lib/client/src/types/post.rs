use serde::{Deserialize, Serialize};

use super::lenient;

/// Feed / profile / saved-list post, with viewer-relative flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "lenient::int")]
    pub post_id: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub user_id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub likes_count: i64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub comments_count: i64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_liked: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_saved: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "lenient::int")]
    pub comment_id: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub post_id: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub user_id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
    pub comment_text: String,
    #[serde(default)]
    pub created_at: Option<String>,
}
