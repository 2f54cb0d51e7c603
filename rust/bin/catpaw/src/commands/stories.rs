//! Story tray, uploads and playback.

use std::path::Path;

use anyhow::Result;
use catpaw_app::CatPawApp;
use catpaw_app::request::{StoriesLoadReq, StoryCloseReq, StoryOpenReq, StoryUploadReq};
use catpaw_app::state::{StoryTray, StoryView};
use catpaw_app::story::StoryPhase;
use tokio::sync::mpsc;

pub async fn tray(app: &CatPawApp) -> Result<()> {
    app.emit(StoriesLoadReq::PATH, StoriesLoadReq).await;
    let tray = app.flux().get_as::<StoryTray>(StoryTray::PATH).unwrap_or_default();
    if let Some(error) = tray.error {
        anyhow::bail!(error);
    }
    if tray.owners.is_empty() {
        println!("No stories right now.");
    }
    for owner in &tray.owners {
        println!("{:<6} @{:<16} {} stories", owner.user_id, owner.username, owner.story_count);
    }
    Ok(())
}

pub async fn upload(app: &CatPawApp, image: &Path) -> Result<()> {
    let image = super::read_image(image).await?;
    app.emit(StoryUploadReq::PATH, StoryUploadReq { image }).await;
    let tray = app.flux().get_as::<StoryTray>(StoryTray::PATH).unwrap_or_default();
    if let Some(error) = tray.error {
        anyhow::bail!(error);
    }
    println!("Story shared.");
    Ok(())
}

/// `[2/3] 5m https://...` for the item on screen, if any.
pub fn render_frame(view: &StoryView) -> Option<String> {
    let index = match view.phase {
        StoryPhase::Playing { index, .. } | StoryPhase::Paused { index, .. } => index,
        _ => return None,
    };
    let item = view.items.get(index)?;
    Some(format!(
        "[{}/{}] {:<8} {}",
        index + 1,
        view.items.len(),
        item.time_label,
        item.image_url.as_deref().unwrap_or("-"),
    ))
}

/// Play every story of `user_id`, one line per item, until the sequence ends.
pub async fn play(app: &CatPawApp, user_id: i64) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sub = app.flux().subscribe(StoryView::PATH, move |_, value| {
        if let Some(view) = value.downcast_ref::<StoryView>() {
            let _ = tx.send(view.clone());
        }
    });
    app.emit(StoryOpenReq::PATH, StoryOpenReq { user_id }).await;

    let mut shown = None;
    let mut played = 0;
    loop {
        let view = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            view = rx.recv() => match view {
                Some(view) => view,
                None => break,
            },
        };
        if view.user_id != user_id {
            continue;
        }
        if view.phase == StoryPhase::Finished {
            break;
        }
        if let Some(line) = render_frame(&view) {
            if shown.as_ref() != Some(&line) {
                println!("{line}");
                played += 1;
                shown = Some(line);
            }
        }
    }

    app.flux().unsubscribe(StoryView::PATH, sub);
    app.emit(StoryCloseReq::PATH, StoryCloseReq).await;
    if played == 0 {
        println!("No stories from user {user_id}.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catpaw_app::state::StoryItem;

    fn view(phase: StoryPhase) -> StoryView {
        StoryView {
            user_id: 8,
            items: (1..=3)
                .map(|i| StoryItem {
                    story_id: i,
                    image_url: Some(format!("http://catpaw.test/uploads/s{i}.jpg")),
                    time_label: "1h".into(),
                })
                .collect(),
            phase,
            segments: vec![1.0, 0.5, 0.0],
        }
    }

    #[test]
    fn frame_names_position_and_image() {
        let line = render_frame(&view(StoryPhase::Playing { index: 1, progress: 0.5 })).unwrap();
        assert_eq!(line, "[2/3] 1h       http://catpaw.test/uploads/s2.jpg");
        assert!(render_frame(&view(StoryPhase::Paused { index: 0, progress: 0.2 })).is_some());
    }

    #[test]
    fn nothing_to_show_while_loading_or_done() {
        assert!(render_frame(&view(StoryPhase::Loading)).is_none());
        assert!(render_frame(&view(StoryPhase::Finished)).is_none());
    }
}
