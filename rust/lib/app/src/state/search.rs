//! User search: `search/state`.

use super::auth::UserSummary;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<UserSummary>,
    pub loading: bool,
}

impl SearchState {
    pub const PATH: &'static str = "search/state";
}
