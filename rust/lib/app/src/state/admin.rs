//! Admin console: `admin/state`.

use catpaw_client::AdminStats;

use super::auth::UserSummary;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminState {
    pub stats: AdminStats,
    pub users: Vec<UserSummary>,
    pub loading: bool,
    pub busy: bool,
    /// The session is not an admin; nothing was requested.
    pub denied: bool,
    pub error: Option<String>,
}

impl AdminState {
    pub const PATH: &'static str = "admin/state";

    pub fn denied() -> Self {
        Self { denied: true, ..Self::default() }
    }
}
