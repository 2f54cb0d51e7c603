//! Story tray, upload and the full-screen viewer.
//!
//! At most one story sequence is open at a time. Opening another replaces
//! it; the replaced sequence's driver and pending fetch are cancelled.
//! Lock order is the open-story slot first, then the player.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use catpaw_client::{NewStory, Story};
use catpaw_flux::StateStore;
use chrono::Utc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::convert::time_label;
use super::{CatPawContext, signed_in, still_current};
use crate::request::*;
use crate::state::*;
use crate::story::{StoryDriver, StoryPhase, StoryPlayer, TapZone};

/// The sequence currently shown in the viewer.
pub(crate) struct OpenStory {
    id: u64,
    user_id: i64,
    items: Vec<StoryItem>,
    player: Arc<Mutex<StoryPlayer>>,
    cancel: CancellationToken,
    driver: Option<StoryDriver>,
}

impl OpenStory {
    pub(crate) fn is_finished(&self) -> bool {
        self.player.lock().unwrap().is_finished()
    }
}

impl Drop for OpenStory {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn story_items(stories: &[Story], ctx: &CatPawContext) -> Vec<StoryItem> {
    let now = Utc::now();
    stories
        .iter()
        .map(|s| StoryItem {
            story_id: s.story_id,
            image_url: ctx.media.resolve(Some(&s.image_url)),
            time_label: time_label(s.created_at.as_deref(), now),
        })
        .collect()
}

async fn load_tray(store: &StateStore, ctx: &CatPawContext) {
    let Some(session) = signed_in(ctx, StoryTray::PATH) else {
        return;
    };
    store.update::<StoryTray, _>(StoryTray::PATH, |s| StoryTray {
        loading: true,
        ..s.cloned().unwrap_or_default()
    });

    let result = ctx.api.story_tray(session.user_id).await;
    if !still_current(ctx, &session, "story tray") {
        return;
    }
    let owners = match result {
        Ok(owners) => Some(
            owners
                .iter()
                .map(|o| StoryOwnerItem {
                    user_id: o.user_id,
                    username: o.username.clone(),
                    avatar: ctx.media.resolve(o.profile_pic.as_deref()),
                    story_count: o.story_count,
                })
                .collect(),
        ),
        Err(e) => {
            warn!("story tray load failed: {e}");
            None
        }
    };
    store.update::<StoryTray, _>(StoryTray::PATH, |s| {
        let current = s.cloned().unwrap_or_default();
        StoryTray {
            owners: owners.unwrap_or(current.owners),
            loading: false,
            ..current
        }
    });
}

/// Handle `stories/load`.
pub async fn handle_tray_load(_req: StoriesLoadReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    load_tray(&store, &ctx).await;
}

/// Handle `story/upload`.
pub async fn handle_upload(req: StoryUploadReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, StoryUploadReq::PATH) else {
        return;
    };
    store.update::<StoryTray, _>(StoryTray::PATH, |s| StoryTray {
        uploading: true,
        error: None,
        ..s.cloned().unwrap_or_default()
    });

    let result = ctx.api.upload_story(session.user_id, NewStory { image: req.image }).await;
    if !still_current(&ctx, &session, "story upload") {
        return;
    }
    let error = result.err().map(|e| {
        warn!("story upload failed: {e}");
        e.user_message()
    });
    let ok = error.is_none();
    store.update::<StoryTray, _>(StoryTray::PATH, |s| StoryTray {
        uploading: false,
        error,
        ..s.cloned().unwrap_or_default()
    });
    if ok {
        info!(user_id = session.user_id, "story uploaded");
        load_tray(&store, &ctx).await;
    }
}

/// Handle `story/open`: fetch the user's stories and start playback.
pub async fn handle_open(req: StoryOpenReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, StoryOpenReq::PATH) else {
        return;
    };
    let id = ctx.story_seq.fetch_add(1, Ordering::SeqCst) + 1;
    let player = Arc::new(Mutex::new(StoryPlayer::new(ctx.config.story_item_duration())));
    let cancel = CancellationToken::new();
    let replaced = ctx.story.lock().unwrap().replace(OpenStory {
        id,
        user_id: req.user_id,
        items: Vec::new(),
        player: Arc::clone(&player),
        cancel: cancel.clone(),
        driver: None,
    });
    drop(replaced);
    store.set(StoryView::PATH, StoryView::loading(req.user_id));

    let result = tokio::select! {
        _ = cancel.cancelled() => {
            debug!(user_id = req.user_id, "story load abandoned");
            return;
        }
        r = ctx.api.user_stories(req.user_id) => r,
    };
    if !still_current(&ctx, &session, "stories") {
        return;
    }
    let items = match result {
        Ok(stories) => Some(story_items(&stories, &ctx)),
        Err(e) => {
            warn!(user_id = req.user_id, "stories load failed: {e}");
            None
        }
    };

    let mut slot = ctx.story.lock().unwrap();
    if slot.as_ref().map(|o| o.id) != Some(id) {
        return;
    }
    let finished = {
        let mut p = player.lock().unwrap();
        match &items {
            Some(items) => p.loaded(items.len(), Instant::now()),
            None => p.load_failed(),
        }
        let shown = items.as_deref().unwrap_or_default();
        store.set(StoryView::PATH, StoryView::render(req.user_id, shown, &p));
        p.is_finished()
    };
    let items = match items {
        Some(items) if !finished => items,
        _ => {
            slot.take();
            return;
        }
    };
    let Some(open) = slot.as_mut() else {
        return;
    };

    info!(user_id = req.user_id, count = items.len(), "story playback started");
    open.items = items.clone();
    let frames = Arc::clone(&store);
    let user_id = req.user_id;
    open.driver = Some(StoryDriver::spawn(
        player,
        ctx.config.story_tick(),
        cancel,
        move |p| frames.set(StoryView::PATH, StoryView::render(user_id, &items, p)),
    ));
}

/// Apply `f` to the open player and publish the result.
fn with_player(store: &StateStore, ctx: &CatPawContext, f: impl FnOnce(&mut StoryPlayer, Instant)) {
    let mut slot = ctx.story.lock().unwrap();
    let Some(open) = slot.as_ref() else {
        debug!("no story open");
        return;
    };
    let finished = {
        let mut p = open.player.lock().unwrap();
        if p.phase() == StoryPhase::Loading {
            return;
        }
        f(&mut p, Instant::now());
        store.set(StoryView::PATH, StoryView::render(open.user_id, &open.items, &p));
        p.is_finished()
    };
    if finished {
        slot.take();
    }
}

/// Handle `story/press`: hold to pause.
pub async fn handle_press(_req: StoryPressReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    with_player(&store, &ctx, |p, now| p.press(now));
}

/// Handle `story/release`.
pub async fn handle_release(_req: StoryReleaseReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    with_player(&store, &ctx, |p, now| p.release(now));
}

/// Handle `story/tap`: left half goes back, right half goes forward.
pub async fn handle_tap(req: StoryTapReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let zone = TapZone::from_position(req.x, req.width);
    with_player(&store, &ctx, |p, now| p.tap(zone, now));
}

/// Handle `story/close`.
pub async fn handle_close(_req: StoryCloseReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let closed = ctx.story.lock().unwrap().take();
    if closed.is_some() {
        debug!("story closed");
    }
    drop(closed);
    store.update_if::<StoryView, _>(StoryView::PATH, |v| {
        let v = v?;
        (v.phase != StoryPhase::Finished)
            .then(|| StoryView { phase: StoryPhase::Finished, ..v.clone() })
    });
}
