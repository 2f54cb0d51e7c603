//! Profile and user requests.

use catpaw_client::ImageUpload;

#[derive(Debug, Clone)]
pub struct ProfileLoadReq {
    pub user_id: i64,
}

impl ProfileLoadReq {
    pub const PATH: &'static str = "profile/load";
}

/// Edit the viewer's own profile.
#[derive(Debug, Clone)]
pub struct ProfileUpdateReq {
    pub full_name: String,
    pub bio: String,
    pub profile_pic: Option<ImageUpload>,
}

impl ProfileUpdateReq {
    pub const PATH: &'static str = "profile/update";
}

/// Toggle following a user.
#[derive(Debug, Clone)]
pub struct FollowUserReq {
    pub user_id: i64,
}

impl FollowUserReq {
    pub const PATH: &'static str = "user/follow";
}

#[derive(Debug, Clone)]
pub struct SearchUsersReq {
    pub query: String,
}

impl SearchUsersReq {
    pub const PATH: &'static str = "search/users";
}
