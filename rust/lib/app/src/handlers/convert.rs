//! Backend rows to screen items.

use catpaw_client::{Interaction, MediaResolver, Post, User};
use catpaw_flux::StateStore;
use chrono::{DateTime, Utc};

use crate::handlers::CatPawContext;
use crate::optimistic::ToggleState;
use crate::state::{PostItem, UserSummary};
use crate::timefmt;

pub fn time_label(created_at: Option<&str>, now: DateTime<Utc>) -> String {
    created_at
        .map(|t| timefmt::relative_label(t, now))
        .unwrap_or_default()
}

pub fn post_item(post: &Post, viewer_id: i64, media: &MediaResolver, now: DateTime<Utc>) -> PostItem {
    PostItem {
        post_id: post.post_id,
        author_id: post.user_id,
        author_username: post.username.clone(),
        author_avatar: media.resolve(post.profile_pic.as_deref()),
        image_url: media.resolve(post.image_url.as_deref()),
        caption: post.caption.clone().unwrap_or_default(),
        likes_count: post.likes_count,
        comments_count: post.comments_count,
        liked: post.is_liked,
        saved: post.is_saved,
        time_label: time_label(post.created_at.as_deref(), now),
        can_delete: post.user_id == viewer_id,
    }
}

/// Convert fetched posts and re-seed their like/save toggles.
pub fn post_items(
    posts: &[Post],
    viewer_id: i64,
    store: &StateStore,
    ctx: &CatPawContext,
) -> Vec<PostItem> {
    let now = Utc::now();
    posts
        .iter()
        .map(|post| {
            ctx.toggler.seed(
                store,
                Interaction::Like,
                post.post_id,
                ToggleState::new(post.is_liked, post.likes_count),
            );
            ctx.toggler.seed(
                store,
                Interaction::Save,
                post.post_id,
                ToggleState::new(post.is_saved, i64::from(post.is_saved)),
            );
            post_item(post, viewer_id, &ctx.media, now)
        })
        .collect()
}

pub fn user_summary(user: &User, media: &MediaResolver) -> UserSummary {
    UserSummary {
        user_id: user.user_id,
        username: user.username.clone(),
        display_name: user
            .full_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| user.username.clone()),
        avatar: media.resolve(user.profile_pic.as_deref()),
        is_admin: user.is_admin(),
    }
}
