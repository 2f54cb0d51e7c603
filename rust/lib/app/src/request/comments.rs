//! Comment requests.

#[derive(Debug, Clone)]
pub struct CommentsLoadReq {
    pub post_id: i64,
}

impl CommentsLoadReq {
    pub const PATH: &'static str = "comments/load";
}

#[derive(Debug, Clone)]
pub struct AddCommentReq {
    pub post_id: i64,
    pub text: String,
}

impl AddCommentReq {
    pub const PATH: &'static str = "comment/add";
}

#[derive(Debug, Clone)]
pub struct DeleteCommentReq {
    pub post_id: i64,
    pub comment_id: i64,
}

impl DeleteCommentReq {
    pub const PATH: &'static str = "comment/delete";
}
