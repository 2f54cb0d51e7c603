use serde::{Deserialize, Serialize};

use super::lenient;

/// One entry of the story tray: a user with at least one live story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryOwner {
    #[serde(deserialize_with = "lenient::int")]
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub story_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    #[serde(deserialize_with = "lenient::int")]
    pub story_id: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub user_id: i64,
    pub image_url: String,
    #[serde(default)]
    pub created_at: Option<String>,
}
