use serde::{Deserialize, Serialize};

use super::lenient;

/// Inbox row: the latest exchange with one other user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(deserialize_with = "lenient::int")]
    pub other_user_id: i64,
    pub username: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub last_message_time: Option<String>,
}

/// Chat message. The server returns a thread ascending by `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(deserialize_with = "lenient::int")]
    pub message_id: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub sender_id: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub receiver_id: i64,
    pub message_text: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_read: bool,
}
