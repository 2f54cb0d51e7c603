//! Comment threads under a post.

use std::sync::Arc;

use catpaw_client::Comment;
use catpaw_flux::StateStore;
use chrono::Utc;
use tracing::warn;

use super::convert::time_label;
use super::{CatPawContext, signed_in, still_current};
use crate::request::*;
use crate::state::*;

fn comment_item(c: &Comment, viewer_id: i64, ctx: &CatPawContext) -> CommentItem {
    CommentItem {
        comment_id: c.comment_id,
        author_id: c.user_id,
        author_username: c.username.clone(),
        author_avatar: ctx.media.resolve(c.profile_pic.as_deref()),
        text: c.comment_text.clone(),
        time_label: time_label(c.created_at.as_deref(), Utc::now()),
        can_delete: c.user_id == viewer_id,
    }
}

async fn load_comments(store: &StateStore, ctx: &CatPawContext, post_id: i64) {
    let Some(session) = signed_in(ctx, CommentsLoadReq::PATH) else {
        return;
    };
    let path = CommentsState::path(post_id);
    store.update::<CommentsState, _>(&path, |s| CommentsState {
        post_id,
        loading: true,
        ..s.cloned().unwrap_or_default()
    });

    let result = ctx.api.comments(post_id).await;
    if !still_current(ctx, &session, "comments") {
        return;
    }
    store.update::<CommentsState, _>(&path, |s| {
        let current = s.cloned().unwrap_or_default();
        match &result {
            Ok(comments) => CommentsState {
                items: comments.iter().map(|c| comment_item(c, session.user_id, ctx)).collect(),
                loading: false,
                ..current
            },
            Err(e) => {
                warn!(post_id, "comments load failed: {e}");
                CommentsState { loading: false, ..current }
            }
        }
    });
}

fn set_error(store: &StateStore, post_id: i64, error: Option<String>) {
    store.update::<CommentsState, _>(&CommentsState::path(post_id), |s| CommentsState {
        post_id,
        busy: false,
        error,
        ..s.cloned().unwrap_or_default()
    });
}

/// Handle `comments/load`.
pub async fn handle_load(req: CommentsLoadReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    load_comments(&store, &ctx, req.post_id).await;
}

/// Handle `comment/add`: send, then refetch the thread.
pub async fn handle_add(req: AddCommentReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, AddCommentReq::PATH) else {
        return;
    };
    let text = req.text.trim();
    if text.is_empty() {
        return;
    }
    store.update::<CommentsState, _>(&CommentsState::path(req.post_id), |s| CommentsState {
        post_id: req.post_id,
        busy: true,
        error: None,
        ..s.cloned().unwrap_or_default()
    });

    let result = ctx.api.add_comment(session.user_id, req.post_id, text).await;
    if !still_current(&ctx, &session, "comment") {
        return;
    }
    match result {
        Ok(()) => {
            set_error(&store, req.post_id, None);
            load_comments(&store, &ctx, req.post_id).await;
        }
        Err(e) => {
            warn!(post_id = req.post_id, "add comment failed: {e}");
            set_error(&store, req.post_id, Some(e.user_message()));
        }
    }
}

/// Handle `comment/delete`. Only the comment's author may delete it.
pub async fn handle_delete(req: DeleteCommentReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, DeleteCommentReq::PATH) else {
        return;
    };
    let own = store
        .get_as::<CommentsState>(&CommentsState::path(req.post_id))
        .and_then(|s| s.items.into_iter().find(|c| c.comment_id == req.comment_id))
        .is_some_and(|c| c.author_id == session.user_id);
    if !own {
        set_error(&store, req.post_id, Some("You can only delete your own comments".into()));
        return;
    }

    let result = ctx.api.delete_comment(session.user_id, req.comment_id).await;
    if !still_current(&ctx, &session, "comment delete") {
        return;
    }
    match result {
        Ok(()) => load_comments(&store, &ctx, req.post_id).await,
        Err(e) => {
            warn!(comment_id = req.comment_id, "delete comment failed: {e}");
            set_error(&store, req.post_id, Some(e.user_message()));
        }
    }
}
