use serde::{Deserialize, Serialize};

use super::lenient;

/// A user row as returned by login, search and the admin user list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "lenient::int")]
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_role() -> String {
    "user".into()
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

/// `get_profile.php` answer, relative to the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(deserialize_with = "lenient::int")]
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub posts_count: i64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub followers_count: i64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub following_count: i64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_following: bool,
}
