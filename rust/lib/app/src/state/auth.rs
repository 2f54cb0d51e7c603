//! Auth state: `auth/state`, `auth/signup`.

use crate::session::Session;

/// Authentication state; the shell reads it to pick login vs home.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub user: Option<UserSummary>,
    pub busy: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Unauthenticated,
    Authenticated,
}

/// Compact user card shown in headers, search results and admin lists.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub is_admin: bool,
}

impl AuthState {
    pub const PATH: &'static str = "auth/state";

    pub fn signed_out() -> Self {
        Self { phase: AuthPhase::Unauthenticated, user: None, busy: false, error: None }
    }

    pub fn busy() -> Self {
        Self { busy: true, ..Self::signed_out() }
    }

    pub fn failed(error: String) -> Self {
        Self { error: Some(error), ..Self::signed_out() }
    }

    pub fn signed_in(session: &Session, avatar: Option<String>) -> Self {
        Self {
            phase: AuthPhase::Authenticated,
            user: Some(UserSummary {
                user_id: session.user_id,
                username: session.username.clone(),
                display_name: session
                    .full_name
                    .clone()
                    .unwrap_or_else(|| session.username.clone()),
                avatar,
                is_admin: session.is_admin(),
            }),
            busy: false,
            error: None,
        }
    }
}

/// Signup form progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupState {
    pub busy: bool,
    pub done: bool,
    pub error: Option<String>,
}

impl SignupState {
    pub const PATH: &'static str = "auth/signup";
}
