//! Admin console.

use anyhow::Result;
use catpaw_app::CatPawApp;
use catpaw_app::request::{AdminDeletePostReq, AdminDeleteUserReq, AdminLoadReq};
use catpaw_app::state::AdminState;

async fn load(app: &CatPawApp) -> Result<AdminState> {
    app.emit(AdminLoadReq::PATH, AdminLoadReq).await;
    finish(app)
}

fn finish(app: &CatPawApp) -> Result<AdminState> {
    let state = app.flux().get_as::<AdminState>(AdminState::PATH).unwrap_or_default();
    if state.denied {
        anyhow::bail!("Admin access required");
    }
    match &state.error {
        Some(error) => anyhow::bail!(error.clone()),
        None => Ok(state),
    }
}

pub async fn stats(app: &CatPawApp) -> Result<()> {
    let s = load(app).await?.stats;
    println!("Users:     {}", s.total_users);
    println!("Posts:     {}", s.total_posts);
    println!("Adoptions: {}", s.total_adoptions);
    println!("Events:    {}", s.total_events);
    Ok(())
}

pub async fn users(app: &CatPawApp) -> Result<()> {
    let state = load(app).await?;
    println!("{:<6} {:<18} {:<24} ROLE", "ID", "USERNAME", "NAME");
    for u in &state.users {
        let role = if u.is_admin { "admin" } else { "user" };
        println!("{:<6} {:<18} {:<24} {}", u.user_id, u.username, u.display_name, role);
    }
    Ok(())
}

pub async fn delete_user(app: &CatPawApp, user_id: i64) -> Result<()> {
    load(app).await?;
    app.emit(AdminDeleteUserReq::PATH, AdminDeleteUserReq { user_id }).await;
    let state = finish(app)?;
    if state.users.iter().any(|u| u.user_id == user_id) {
        anyhow::bail!("user {user_id} was not deleted");
    }
    println!("Deleted user {user_id}.");
    Ok(())
}

pub async fn delete_post(app: &CatPawApp, post_id: i64) -> Result<()> {
    load(app).await?;
    app.emit(AdminDeletePostReq::PATH, AdminDeletePostReq { post_id }).await;
    finish(app)?;
    println!("Deleted post {post_id}.");
    Ok(())
}
