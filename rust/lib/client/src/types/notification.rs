use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(deserialize_with = "lenient::int")]
    pub notification_id: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub user_id: i64,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub actor_id: Option<i64>,
    #[serde(default)]
    pub actor_username: Option<String>,
    #[serde(default)]
    pub actor_profile_pic: Option<String>,
    /// `like`, `comment`, `follow`, `message`, `event`…
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub post_id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}
