//! Profiles, follows and user search.

use std::sync::Arc;

use catpaw_client::{Interaction, Profile, ProfileUpdate};
use catpaw_flux::StateStore;
use tracing::{debug, info, warn};

use super::convert::{post_items, user_summary};
use super::{CatPawContext, signed_in, still_current};
use crate::optimistic::ToggleState;
use crate::request::*;
use crate::state::*;

fn profile_view(p: &Profile, ctx: &CatPawContext) -> ProfileView {
    ProfileView {
        user_id: p.user_id,
        username: p.username.clone(),
        display_name: p
            .full_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| p.username.clone()),
        bio: p.bio.clone().unwrap_or_default(),
        avatar: ctx.media.resolve(p.profile_pic.as_deref()),
        posts_count: p.posts_count,
        followers_count: p.followers_count,
        following_count: p.following_count,
        is_following: p.is_following,
    }
}

/// Fetch a profile and its posts into `profile/{user_id}`.
pub async fn load_profile(store: &StateStore, ctx: &CatPawContext, user_id: i64) {
    let Some(session) = signed_in(ctx, ProfileLoadReq::PATH) else {
        return;
    };
    let path = ProfileState::path(user_id);
    let is_self = user_id == session.user_id;
    store.update::<ProfileState, _>(&path, |s| ProfileState {
        is_self,
        loading: true,
        ..s.cloned().unwrap_or_default()
    });

    let (profile, posts) = tokio::join!(
        ctx.api.profile(user_id, session.user_id),
        ctx.api.user_posts(user_id, session.user_id),
    );
    if !still_current(ctx, &session, "profile") {
        return;
    }

    let mut next = store.get_as::<ProfileState>(&path).unwrap_or_default();
    next.is_self = is_self;
    next.loading = false;
    match profile {
        Ok(p) => {
            ctx.toggler.seed(
                store,
                Interaction::Follow,
                user_id,
                ToggleState::new(p.is_following, p.followers_count),
            );
            next.profile = Some(profile_view(&p, ctx));
            next.error = None;
        }
        Err(e) => {
            warn!(user_id, "profile load failed: {e}");
            if next.profile.is_none() {
                next.error = Some(e.user_message());
            }
        }
    }
    match posts {
        Ok(posts) => next.posts = post_items(&posts, session.user_id, store, ctx),
        Err(e) => warn!(user_id, "profile posts load failed: {e}"),
    }
    store.set(&path, next);
}

/// Handle `profile/load`.
pub async fn handle_load(req: ProfileLoadReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    load_profile(&store, &ctx, req.user_id).await;
}

/// Handle `profile/update`. Always edits the viewer's own profile.
pub async fn handle_update(req: ProfileUpdateReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, ProfileUpdateReq::PATH) else {
        return;
    };
    let path = ProfileState::path(session.user_id);
    store.update::<ProfileState, _>(&path, |s| ProfileState {
        is_self: true,
        busy: true,
        error: None,
        ..s.cloned().unwrap_or_default()
    });

    let update = ProfileUpdate {
        full_name: req.full_name.trim().to_string(),
        bio: req.bio.trim().to_string(),
        profile_pic: req.profile_pic,
    };
    let result = ctx.api.update_profile(session.user_id, update).await;
    if !still_current(&ctx, &session, "profile update") {
        return;
    }
    let error = match result {
        Ok(()) => {
            info!(user_id = session.user_id, "profile updated");
            None
        }
        Err(e) => {
            warn!("profile update failed: {e}");
            Some(e.user_message())
        }
    };
    let ok = error.is_none();
    store.update::<ProfileState, _>(&path, |s| ProfileState {
        busy: false,
        error,
        ..s.cloned().unwrap_or_default()
    });
    if ok {
        load_profile(&store, &ctx, session.user_id).await;
    }
}

/// Handle `user/follow`. Following yourself is ignored.
pub async fn handle_follow(req: FollowUserReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, FollowUserReq::PATH) else {
        return;
    };
    if req.user_id == session.user_id {
        debug!("ignored self-follow");
        return;
    }
    ctx.toggler.toggle(&store, Interaction::Follow, session.user_id, req.user_id);
}

/// Handle `search/users`. A blank query clears the results.
pub async fn handle_search(req: SearchUsersReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, SearchUsersReq::PATH) else {
        return;
    };
    let query = req.query.trim().to_string();
    if query.is_empty() {
        store.set(SearchState::PATH, SearchState::default());
        return;
    }
    store.set(SearchState::PATH, SearchState {
        query: query.clone(),
        results: Vec::new(),
        loading: true,
    });

    let result = ctx.api.search_users(&query).await;
    if !still_current(&ctx, &session, "search") {
        return;
    }
    let results = match result {
        Ok(users) => users.iter().map(|u| user_summary(u, &ctx.media)).collect(),
        Err(e) => {
            warn!("search failed: {e}");
            Vec::new()
        }
    };
    // A newer query may have been typed meanwhile.
    store.update_if::<SearchState, _>(SearchState::PATH, |s| {
        let s = s?;
        (s.query == query).then(|| SearchState { results, loading: false, ..s.clone() })
    });
}
