//! Feed state: `feed/state`, `saved/state`.

/// A post as rendered in any list.
///
/// `likes_count`, `liked` and `saved` are the values from the last fetch
/// and seed the toggles. They are not touched by a toggle; read the live
/// pair from `posts/{id}/like` and `posts/{id}/save`.
#[derive(Debug, Clone, PartialEq)]
pub struct PostItem {
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub image_url: Option<String>,
    pub caption: String,
    /// As fetched.
    pub likes_count: i64,
    pub comments_count: i64,
    /// As fetched.
    pub liked: bool,
    /// As fetched.
    pub saved: bool,
    pub time_label: String,
    /// Only the owner gets the delete action.
    pub can_delete: bool,
}

/// Home feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    pub items: Vec<PostItem>,
    pub loading: bool,
    pub error: Option<String>,
}

impl FeedState {
    pub const PATH: &'static str = "feed/state";

    pub fn find(&self, post_id: i64) -> Option<&PostItem> {
        self.items.iter().find(|p| p.post_id == post_id)
    }
}

/// The viewer's saved posts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedState {
    pub items: Vec<PostItem>,
    pub loading: bool,
}

impl SavedState {
    pub const PATH: &'static str = "saved/state";
}
