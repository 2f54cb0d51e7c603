//! Auth requests.

#[derive(Debug, Clone)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

impl LoginReq {
    pub const PATH: &'static str = "auth/login";
}

/// Register, then log in with the same credentials.
#[derive(Debug, Clone)]
pub struct SignupReq {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl SignupReq {
    pub const PATH: &'static str = "auth/signup";
}

#[derive(Debug, Clone)]
pub struct LogoutReq;

impl LogoutReq {
    pub const PATH: &'static str = "auth/logout";
}
