use serde::{Deserialize, Serialize};

use super::lenient;

/// Community event, with the viewer's participation flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(deserialize_with = "lenient::int")]
    pub event_id: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub created_by: i64,
    #[serde(default)]
    pub creator_username: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub participants_count: i64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_joined: bool,
}
