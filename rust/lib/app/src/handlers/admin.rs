//! Admin console. Every operation requires an admin session.

use std::sync::Arc;

use catpaw_flux::StateStore;
use tracing::{info, warn};

use super::convert::user_summary;
use super::{CatPawContext, feed, signed_in, still_current};
use crate::request::*;
use crate::session::Session;
use crate::state::*;

/// The admin session, or `None` after marking the console denied.
fn admin_session(store: &StateStore, ctx: &CatPawContext, path: &str) -> Option<Session> {
    let session = signed_in(ctx, path)?;
    if !session.is_admin() {
        warn!(user_id = session.user_id, path, "admin operation refused");
        store.set(AdminState::PATH, AdminState::denied());
        return None;
    }
    Some(session)
}

async fn load_admin(store: &StateStore, ctx: &CatPawContext, session: &Session) {
    store.update::<AdminState, _>(AdminState::PATH, |s| AdminState {
        loading: true,
        denied: false,
        ..s.cloned().unwrap_or_default()
    });

    let (stats, users) = tokio::join!(
        ctx.api.admin_stats(session.user_id),
        ctx.api.admin_users(session.user_id),
    );
    if !still_current(ctx, session, "admin data") {
        return;
    }
    let mut next = store.get_as::<AdminState>(AdminState::PATH).unwrap_or_default();
    next.loading = false;
    match stats {
        Ok(stats) => next.stats = stats,
        Err(e) => {
            warn!("admin stats load failed: {e}");
            next.error = Some(e.user_message());
        }
    }
    match users {
        Ok(users) => next.users = users.iter().map(|u| user_summary(u, &ctx.media)).collect(),
        Err(e) => {
            warn!("admin users load failed: {e}");
            next.error = Some(e.user_message());
        }
    }
    store.set(AdminState::PATH, next);
}

fn set_busy(store: &StateStore, busy: bool, error: Option<String>) {
    store.update::<AdminState, _>(AdminState::PATH, |s| AdminState {
        busy,
        error,
        ..s.cloned().unwrap_or_default()
    });
}

/// Handle `admin/load`.
pub async fn handle_load(_req: AdminLoadReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    if let Some(session) = admin_session(&store, &ctx, AdminLoadReq::PATH) {
        load_admin(&store, &ctx, &session).await;
    }
}

/// Handle `admin/delete-user`. Admins cannot delete themselves.
pub async fn handle_delete_user(req: AdminDeleteUserReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = admin_session(&store, &ctx, AdminDeleteUserReq::PATH) else {
        return;
    };
    if req.user_id == session.user_id {
        set_busy(&store, false, Some("You cannot delete your own account".into()));
        return;
    }
    set_busy(&store, true, None);

    let result = ctx.api.admin_delete_user(session.user_id, req.user_id).await;
    if !still_current(&ctx, &session, "user delete") {
        return;
    }
    match result {
        Ok(()) => {
            info!(user_id = req.user_id, "user deleted by admin");
            set_busy(&store, false, None);
            load_admin(&store, &ctx, &session).await;
        }
        Err(e) => {
            warn!("admin delete user failed: {e}");
            set_busy(&store, false, Some(e.user_message()));
        }
    }
}

/// Handle `admin/delete-post`. Works on any post.
pub async fn handle_delete_post(req: AdminDeletePostReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = admin_session(&store, &ctx, AdminDeletePostReq::PATH) else {
        return;
    };
    set_busy(&store, true, None);

    let result = ctx.api.admin_delete_post(session.user_id, req.post_id).await;
    if !still_current(&ctx, &session, "post delete") {
        return;
    }
    match result {
        Ok(()) => {
            info!(post_id = req.post_id, "post deleted by admin");
            store.remove_prefix(&format!("posts/{}", req.post_id));
            set_busy(&store, false, None);
            load_admin(&store, &ctx, &session).await;
            if store.contains(FeedState::PATH) {
                feed::load_feed(&store, &ctx).await;
            }
        }
        Err(e) => {
            warn!("admin delete post failed: {e}");
            set_busy(&store, false, Some(e.user_message()));
        }
    }
}
