//! Feed, saved posts, post actions and comments.

use std::path::Path;

use anyhow::Result;
use catpaw_app::CatPawApp;
use catpaw_app::optimistic::toggle_path;
use catpaw_app::request::{
    AddCommentReq, CommentsLoadReq, CreatePostReq, DeleteCommentReq, DeletePostReq, FeedLoadReq, LikePostReq,
    SavePostReq, SavedLoadReq,
};
use catpaw_app::state::{CommentsState, ComposeState, FeedState, PostItem, SavedState};
use catpaw_app::ToggleState;
use catpaw_client::Interaction;
use catpaw_flux::Flux;

/// What to do with a post's comment thread.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentAction {
    List,
    Add(String),
    Delete(i64),
}

/// One line per post. Live toggle state wins over the fetched counts.
pub fn render_post(post: &PostItem, like: Option<ToggleState>, saved: Option<ToggleState>) -> String {
    let like = like.unwrap_or(ToggleState::new(post.liked, post.likes_count));
    let saved = saved.map_or(post.saved, |s| s.active);
    format!(
        "#{:<5} @{:<16} {}{} {:>3} likes {:>3} comments  {:<8} {}",
        post.post_id,
        post.author_username,
        if like.active { '♥' } else { '♡' },
        if saved { '★' } else { ' ' },
        like.count,
        post.comments_count,
        post.time_label,
        post.caption,
    )
}

fn print_posts(flux: &Flux, posts: &[PostItem]) {
    if posts.is_empty() {
        println!("No posts yet.");
        return;
    }
    for post in posts {
        let like = flux.get_as::<ToggleState>(&toggle_path(Interaction::Like, post.post_id));
        let saved = flux.get_as::<ToggleState>(&toggle_path(Interaction::Save, post.post_id));
        println!("{}", render_post(post, like, saved));
    }
}

pub async fn list(app: &CatPawApp) -> Result<()> {
    app.emit(FeedLoadReq::PATH, FeedLoadReq).await;
    let feed = app.flux().get_as::<FeedState>(FeedState::PATH).unwrap_or_default();
    if let Some(error) = feed.error {
        anyhow::bail!(error);
    }
    print_posts(app.flux(), &feed.items);
    Ok(())
}

pub async fn saved(app: &CatPawApp) -> Result<()> {
    app.emit(SavedLoadReq::PATH, SavedLoadReq).await;
    let saved = app.flux().get_as::<SavedState>(SavedState::PATH).unwrap_or_default();
    print_posts(app.flux(), &saved.items);
    Ok(())
}

async fn toggle(app: &CatPawApp, kind: Interaction, post_id: i64) -> Result<ToggleState> {
    match kind {
        Interaction::Save => app.emit(SavePostReq::PATH, SavePostReq { post_id }).await,
        _ => app.emit(LikePostReq::PATH, LikePostReq { post_id }).await,
    }
    app.context().toggler.settle().await;
    app.flux()
        .get_as::<ToggleState>(&toggle_path(kind, post_id))
        .ok_or_else(|| anyhow::anyhow!("post {post_id} is not in your feed"))
}

pub async fn like(app: &CatPawApp, post_id: i64) -> Result<()> {
    let state = toggle(app, Interaction::Like, post_id).await?;
    let verb = if state.active { "Liked" } else { "Unliked" };
    println!("{verb} post {post_id} ({} likes)", state.count);
    Ok(())
}

pub async fn save(app: &CatPawApp, post_id: i64) -> Result<()> {
    let state = toggle(app, Interaction::Save, post_id).await?;
    let verb = if state.active { "Saved" } else { "Removed from saved:" };
    println!("{verb} post {post_id}");
    Ok(())
}

pub async fn create(app: &CatPawApp, image: &Path, caption: String) -> Result<()> {
    let image = super::read_image(image).await?;
    app.emit(CreatePostReq::PATH, CreatePostReq { caption, image }).await;
    let compose = app.flux().get_as::<ComposeState>(ComposeState::PATH).unwrap_or_default();
    if let Some(error) = compose.error {
        anyhow::bail!(error);
    }
    println!("Posted.");
    Ok(())
}

pub async fn delete(app: &CatPawApp, post_id: i64) -> Result<()> {
    app.emit(DeletePostReq::PATH, DeletePostReq { post_id }).await;
    let feed = app.flux().get_as::<FeedState>(FeedState::PATH).unwrap_or_default();
    if let Some(error) = feed.error {
        anyhow::bail!(error);
    }
    if feed.items.iter().any(|p| p.post_id == post_id) {
        anyhow::bail!("post {post_id} was not deleted");
    }
    println!("Deleted post {post_id}.");
    Ok(())
}

pub async fn comments(app: &CatPawApp, post_id: i64, action: CommentAction) -> Result<()> {
    let path = CommentsState::path(post_id);
    app.emit(CommentsLoadReq::PATH, CommentsLoadReq { post_id }).await;
    match action {
        CommentAction::List => {}
        CommentAction::Add(text) => {
            app.emit(AddCommentReq::PATH, AddCommentReq { post_id, text }).await
        }
        CommentAction::Delete(comment_id) => {
            app.emit(DeleteCommentReq::PATH, DeleteCommentReq { post_id, comment_id }).await
        }
    }
    let state = app.flux().get_as::<CommentsState>(&path).unwrap_or_default();
    if let Some(error) = state.error {
        anyhow::bail!(error);
    }
    if state.items.is_empty() {
        println!("No comments.");
    }
    for c in &state.items {
        println!("#{:<5} @{:<16} {:<8} {}", c.comment_id, c.author_username, c.time_label, c.text);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> PostItem {
        PostItem {
            post_id: 3,
            author_id: 7,
            author_username: "tom".into(),
            author_avatar: None,
            image_url: None,
            caption: "sunbathing".into(),
            likes_count: 2,
            comments_count: 1,
            liked: false,
            saved: false,
            time_label: "5m".into(),
            can_delete: true,
        }
    }

    #[test]
    fn fetched_counts_without_toggle() {
        let line = render_post(&post(), None, None);
        assert!(line.starts_with("#3"));
        assert!(line.contains("♡"));
        assert!(line.contains("  2 likes"));
        assert!(line.ends_with("sunbathing"));
    }

    #[test]
    fn toggle_state_overrides_fetched_counts() {
        let line = render_post(&post(), Some(ToggleState::new(true, 3)), Some(ToggleState::new(true, 1)));
        assert!(line.contains("♥★"));
        assert!(line.contains("  3 likes"));
    }
}
