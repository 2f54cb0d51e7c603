use serde::{Deserialize, Serialize};

use super::lenient;

/// A cat up for adoption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adoption {
    #[serde(deserialize_with = "lenient::int")]
    pub adoption_id: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub user_id: i64,
    #[serde(default)]
    pub username: String,
    pub cat_name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub cat_age: Option<String>,
    #[serde(default)]
    pub cat_breed: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_status() -> String {
    Adoption::AVAILABLE.into()
}

impl Adoption {
    pub const AVAILABLE: &'static str = "available";
    pub const ADOPTED: &'static str = "adopted";

    pub fn is_available(&self) -> bool {
        self.status.eq_ignore_ascii_case(Self::AVAILABLE)
    }
}
