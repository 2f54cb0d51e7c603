//! Profiles, follows and user search.

use std::path::Path;

use anyhow::Result;
use catpaw_app::CatPawApp;
use catpaw_app::optimistic::toggle_path;
use catpaw_app::request::{FollowUserReq, ProfileLoadReq, ProfileUpdateReq, SearchUsersReq};
use catpaw_app::state::{ProfileState, ProfileView, SearchState};
use catpaw_app::ToggleState;
use catpaw_client::Interaction;

use super::or_dash;

pub fn render_profile(view: &ProfileView, follow: Option<ToggleState>, is_self: bool) -> String {
    let follow = follow.unwrap_or(ToggleState::new(view.is_following, view.followers_count));
    let badge = match (is_self, follow.active) {
        (true, _) => " (you)",
        (false, true) => " (following)",
        (false, false) => "",
    };
    format!(
        "{} @{}{}\n{}\n{} posts  {} followers  {} following",
        view.display_name,
        view.username,
        badge,
        or_dash(&view.bio),
        view.posts_count,
        follow.count,
        view.following_count,
    )
}

async fn load(app: &CatPawApp, user_id: i64) -> Result<ProfileState> {
    app.emit(ProfileLoadReq::PATH, ProfileLoadReq { user_id }).await;
    let state = app
        .flux()
        .get_as::<ProfileState>(&ProfileState::path(user_id))
        .unwrap_or_default();
    match (&state.profile, &state.error) {
        (None, Some(error)) => anyhow::bail!(error.clone()),
        (None, None) => anyhow::bail!("user {user_id} not found"),
        _ => Ok(state),
    }
}

/// Show a profile, or your own when `user_id` is `None`.
pub async fn show(app: &CatPawApp, user_id: Option<i64>) -> Result<()> {
    let user_id = match user_id.or_else(|| app.context().session.user_id()) {
        Some(id) => id,
        None => anyhow::bail!("not signed in"),
    };
    let state = load(app, user_id).await?;
    if let Some(view) = &state.profile {
        let follow = app.flux().get_as::<ToggleState>(&toggle_path(Interaction::Follow, user_id));
        println!("{}", render_profile(view, follow, state.is_self));
    }
    for post in &state.posts {
        println!("  #{:<5} {:<8} {}", post.post_id, post.time_label, post.caption);
    }
    Ok(())
}

pub async fn follow(app: &CatPawApp, user_id: i64) -> Result<()> {
    if app.context().session.user_id() == Some(user_id) {
        anyhow::bail!("You cannot follow yourself");
    }
    let state = load(app, user_id).await?;
    app.emit(FollowUserReq::PATH, FollowUserReq { user_id }).await;
    app.context().toggler.settle().await;

    let name = state.profile.map(|p| p.username).unwrap_or_default();
    match app.flux().get_as::<ToggleState>(&toggle_path(Interaction::Follow, user_id)) {
        Some(t) if t.active => println!("Following @{name} ({} followers)", t.count),
        Some(t) => println!("Unfollowed @{name} ({} followers)", t.count),
        None => anyhow::bail!("follow state missing for user {user_id}"),
    }
    Ok(())
}

pub async fn update(
    app: &CatPawApp,
    full_name: Option<String>,
    bio: Option<String>,
    picture: Option<&Path>,
) -> Result<()> {
    let Some(user_id) = app.context().session.user_id() else {
        anyhow::bail!("not signed in");
    };
    let profile_pic = match picture {
        Some(path) => Some(super::read_image(path).await?),
        None => None,
    };
    let current = load(app, user_id).await?.profile;
    let full_name = full_name
        .or_else(|| current.as_ref().map(|p| p.display_name.clone()))
        .unwrap_or_default();
    let bio = bio.or_else(|| current.map(|p| p.bio)).unwrap_or_default();
    app.emit(ProfileUpdateReq::PATH, ProfileUpdateReq { full_name, bio, profile_pic }).await;
    let state = app
        .flux()
        .get_as::<ProfileState>(&ProfileState::path(user_id))
        .unwrap_or_default();
    if let Some(error) = state.error {
        anyhow::bail!(error);
    }
    println!("Profile updated.");
    Ok(())
}

pub async fn search(app: &CatPawApp, query: String) -> Result<()> {
    app.emit(SearchUsersReq::PATH, SearchUsersReq { query }).await;
    let state = app.flux().get_as::<SearchState>(SearchState::PATH).unwrap_or_default();
    if state.results.is_empty() {
        println!("No users found.");
    }
    for user in &state.results {
        let admin = if user.is_admin { " [admin]" } else { "" };
        println!("{:<6} @{:<16} {}{}", user.user_id, user.username, user.display_name, admin);
    }
    Ok(())
}
