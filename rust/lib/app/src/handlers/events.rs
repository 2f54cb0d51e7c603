//! Community events.

use std::sync::Arc;

use catpaw_client::{Event, Interaction, NewEvent};
use catpaw_flux::StateStore;
use tracing::{info, warn};

use super::{CatPawContext, signed_in, still_current};
use crate::optimistic::ToggleState;
use crate::request::*;
use crate::state::*;

fn event_item(e: &Event, ctx: &CatPawContext) -> EventItem {
    EventItem {
        event_id: e.event_id,
        creator_id: e.created_by,
        creator_username: e.creator_username.clone().unwrap_or_default(),
        title: e.title.clone(),
        description: e.description.clone().unwrap_or_default(),
        event_date: e.event_date.clone().unwrap_or_default(),
        location: e.location.clone().unwrap_or_default(),
        image_url: ctx.media.resolve(e.image_url.as_deref()),
        participants_count: e.participants_count,
        joined: e.is_joined,
    }
}

async fn load_events(store: &StateStore, ctx: &CatPawContext) {
    let Some(session) = signed_in(ctx, EventsState::PATH) else {
        return;
    };
    store.update::<EventsState, _>(EventsState::PATH, |s| EventsState {
        loading: true,
        ..s.cloned().unwrap_or_default()
    });

    let result = ctx.api.events(session.user_id).await;
    if !still_current(ctx, &session, "events") {
        return;
    }
    let items = match result {
        Ok(rows) => {
            for e in &rows {
                ctx.toggler.seed(
                    store,
                    Interaction::EventJoin,
                    e.event_id,
                    ToggleState::new(e.is_joined, e.participants_count),
                );
            }
            Some(rows.iter().map(|e| event_item(e, ctx)).collect())
        }
        Err(e) => {
            warn!("events load failed: {e}");
            None
        }
    };
    store.update::<EventsState, _>(EventsState::PATH, |s| {
        let current = s.cloned().unwrap_or_default();
        EventsState {
            items: items.unwrap_or(current.items),
            loading: false,
            ..current
        }
    });
}

/// Handle `events/load`.
pub async fn handle_load(_req: EventsLoadReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    load_events(&store, &ctx).await;
}

/// Handle `event/create`. An event needs a title.
pub async fn handle_create(req: CreateEventReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, CreateEventReq::PATH) else {
        return;
    };
    let event = NewEvent { title: req.event.title.trim().to_string(), ..req.event };
    let set = |busy: bool, error: Option<String>| {
        store.update::<EventsState, _>(EventsState::PATH, |s| EventsState {
            busy,
            error,
            ..s.cloned().unwrap_or_default()
        });
    };
    if event.title.is_empty() {
        set(false, Some("Event title is required".into()));
        return;
    }
    set(true, None);

    let result = ctx.api.create_event(session.user_id, event).await;
    if !still_current(&ctx, &session, "event") {
        return;
    }
    match result {
        Ok(()) => {
            info!(user_id = session.user_id, "event created");
            set(false, None);
            load_events(&store, &ctx).await;
        }
        Err(e) => {
            warn!("create event failed: {e}");
            set(false, Some(e.user_message()));
        }
    }
}

/// Handle `event/join`: toggle participation.
pub async fn handle_join(req: JoinEventReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    if let Some(session) = signed_in(&ctx, JoinEventReq::PATH) {
        ctx.toggler.toggle(&store, Interaction::EventJoin, session.user_id, req.event_id);
    }
}
