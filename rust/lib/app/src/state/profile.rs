//! Profile page: `profile/{user_id}`.

use super::feed::PostItem;

/// Profile header. `followers_count` and `is_following` are as fetched;
/// the live pair sits at `users/{id}/follow`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub avatar: Option<String>,
    pub posts_count: i64,
    pub followers_count: i64,
    pub following_count: i64,
    pub is_following: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub profile: Option<ProfileView>,
    pub posts: Vec<PostItem>,
    /// The viewer is looking at their own profile (edit, no follow button).
    pub is_self: bool,
    pub loading: bool,
    pub busy: bool,
    pub error: Option<String>,
}

impl ProfileState {
    pub fn path(user_id: i64) -> String {
        format!("profile/{user_id}")
    }
}
