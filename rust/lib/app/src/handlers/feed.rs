//! Home feed, post mutations and saved posts.

use std::sync::Arc;

use catpaw_client::{Interaction, NewPost};
use catpaw_flux::StateStore;
use tracing::{info, warn};

use super::convert::post_items;
use super::{CatPawContext, profile, signed_in, still_current};
use crate::request::*;
use crate::state::*;

/// Fetch the feed into `feed/state`.
///
/// A failed fetch keeps whatever was shown before.
pub async fn load_feed(store: &StateStore, ctx: &CatPawContext) {
    let Some(session) = signed_in(ctx, FeedState::PATH) else {
        return;
    };
    store.update::<FeedState, _>(FeedState::PATH, |s| FeedState {
        loading: true,
        ..s.cloned().unwrap_or_default()
    });

    let result = ctx.api.feed(session.user_id).await;
    if !still_current(ctx, &session, "feed") {
        return;
    }
    match result {
        Ok(posts) => {
            let items = post_items(&posts, session.user_id, store, ctx);
            store.set(FeedState::PATH, FeedState { items, loading: false, error: None });
        }
        Err(e) => {
            warn!("feed load failed: {e}");
            store.update::<FeedState, _>(FeedState::PATH, |s| FeedState {
                loading: false,
                ..s.cloned().unwrap_or_default()
            });
        }
    }
}

/// Handle `feed/load`.
pub async fn handle_load(_req: FeedLoadReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    load_feed(&store, &ctx).await;
}

/// Handle `post/like`.
pub async fn handle_like(req: LikePostReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    if let Some(session) = signed_in(&ctx, LikePostReq::PATH) {
        ctx.toggler.toggle(&store, Interaction::Like, session.user_id, req.post_id);
    }
}

/// Handle `post/save`.
pub async fn handle_save(req: SavePostReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    if let Some(session) = signed_in(&ctx, SavePostReq::PATH) {
        ctx.toggler.toggle(&store, Interaction::Save, session.user_id, req.post_id);
    }
}

/// Handle `post/create`.
pub async fn handle_create(req: CreatePostReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, CreatePostReq::PATH) else {
        return;
    };
    store.set(ComposeState::PATH, ComposeState { busy: true, ..ComposeState::default() });

    let post = NewPost { caption: req.caption.trim().to_string(), image: req.image };
    let result = ctx.api.create_post(session.user_id, post).await;
    if !still_current(&ctx, &session, "post upload") {
        return;
    }
    match result {
        Ok(()) => {
            info!(user_id = session.user_id, "post created");
            store.set(ComposeState::PATH, ComposeState { done: true, ..ComposeState::default() });
            load_feed(&store, &ctx).await;
        }
        Err(e) => {
            warn!("create post failed: {e}");
            store.set(ComposeState::PATH, ComposeState {
                error: Some(e.user_message()),
                ..ComposeState::default()
            });
        }
    }
}

/// Owner of `post_id` as far as the shown lists know.
fn known_owner(store: &StateStore, viewer_id: i64, post_id: i64) -> Option<i64> {
    let in_feed = store
        .get_as::<FeedState>(FeedState::PATH)
        .and_then(|f| f.find(post_id).map(|p| p.author_id));
    in_feed.or_else(|| {
        store
            .get_as::<ProfileState>(&ProfileState::path(viewer_id))
            .and_then(|p| p.posts.iter().find(|p| p.post_id == post_id).map(|p| p.author_id))
    })
}

/// Handle `post/delete`. Only the author may delete.
pub async fn handle_delete(req: DeletePostReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, DeletePostReq::PATH) else {
        return;
    };
    if known_owner(&store, session.user_id, req.post_id) != Some(session.user_id) {
        warn!(post_id = req.post_id, "refusing to delete someone else's post");
        store.update::<FeedState, _>(FeedState::PATH, |s| FeedState {
            error: Some("You can only delete your own posts".into()),
            ..s.cloned().unwrap_or_default()
        });
        return;
    }

    let result = ctx.api.delete_post(session.user_id, req.post_id).await;
    if !still_current(&ctx, &session, "post delete") {
        return;
    }
    match result {
        Ok(()) => {
            info!(post_id = req.post_id, "post deleted");
            store.remove_prefix(&format!("posts/{}", req.post_id));
            load_feed(&store, &ctx).await;
            if store.contains(&ProfileState::path(session.user_id)) {
                profile::load_profile(&store, &ctx, session.user_id).await;
            }
        }
        Err(e) => {
            warn!("delete post failed: {e}");
            store.update::<FeedState, _>(FeedState::PATH, |s| FeedState {
                error: Some(e.user_message()),
                ..s.cloned().unwrap_or_default()
            });
        }
    }
}

/// Handle `saved/load`.
pub async fn handle_saved_load(_req: SavedLoadReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, SavedState::PATH) else {
        return;
    };
    store.update::<SavedState, _>(SavedState::PATH, |s| SavedState {
        loading: true,
        ..s.cloned().unwrap_or_default()
    });

    let result = ctx.api.saved_posts(session.user_id).await;
    if !still_current(&ctx, &session, "saved posts") {
        return;
    }
    match result {
        Ok(posts) => {
            let items = post_items(&posts, session.user_id, &store, &ctx);
            store.set(SavedState::PATH, SavedState { items, loading: false });
        }
        Err(e) => {
            warn!("saved posts load failed: {e}");
            store.update::<SavedState, _>(SavedState::PATH, |s| SavedState {
                loading: false,
                ..s.cloned().unwrap_or_default()
            });
        }
    }
}
