//! Comment thread: `comments/{post_id}`.

#[derive(Debug, Clone, PartialEq)]
pub struct CommentItem {
    pub comment_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub text: String,
    pub time_label: String,
    pub can_delete: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentsState {
    pub post_id: i64,
    pub items: Vec<CommentItem>,
    pub loading: bool,
    pub busy: bool,
    pub error: Option<String>,
}

impl CommentsState {
    pub fn path(post_id: i64) -> String {
        format!("comments/{post_id}")
    }
}
