//! Admin console requests. Refused without an admin session.

#[derive(Debug, Clone)]
pub struct AdminLoadReq;

impl AdminLoadReq {
    pub const PATH: &'static str = "admin/load";
}

#[derive(Debug, Clone)]
pub struct AdminDeleteUserReq {
    pub user_id: i64,
}

impl AdminDeleteUserReq {
    pub const PATH: &'static str = "admin/delete-user";
}

#[derive(Debug, Clone)]
pub struct AdminDeletePostReq {
    pub post_id: i64,
}

impl AdminDeletePostReq {
    pub const PATH: &'static str = "admin/delete-post";
}
