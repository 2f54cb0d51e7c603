use serde::{Deserialize, Serialize};

use super::lenient;

/// `admin_get_stats.php` answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_users: i64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_posts: i64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_adoptions: i64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_events: i64,
}
