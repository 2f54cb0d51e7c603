//! Cat adoption listings.

use std::sync::Arc;

use catpaw_client::{Adoption, NewAdoption};
use catpaw_flux::StateStore;
use tracing::{info, warn};

use super::{CatPawContext, signed_in, still_current};
use crate::request::*;
use crate::state::*;

fn adoption_item(a: &Adoption, viewer_id: i64, ctx: &CatPawContext) -> AdoptionItem {
    let available = a.is_available();
    AdoptionItem {
        adoption_id: a.adoption_id,
        owner_id: a.user_id,
        owner_username: a.username.clone(),
        cat_name: a.cat_name.clone(),
        cat_age: a.cat_age.clone().unwrap_or_default(),
        cat_breed: a.cat_breed.clone().unwrap_or_default(),
        description: a.description.clone().unwrap_or_default(),
        location: a.location.clone().unwrap_or_default(),
        contact_info: a.contact_info.clone().unwrap_or_default(),
        image_url: ctx.media.resolve(a.image_url.as_deref()),
        available,
        can_mark_adopted: available && a.user_id == viewer_id,
    }
}

async fn load_listings(store: &StateStore, ctx: &CatPawContext) {
    let Some(session) = signed_in(ctx, AdoptionsState::PATH) else {
        return;
    };
    store.update::<AdoptionsState, _>(AdoptionsState::PATH, |s| AdoptionsState {
        loading: true,
        ..s.cloned().unwrap_or_default()
    });

    let result = ctx.api.adoptions().await;
    if !still_current(ctx, &session, "adoptions") {
        return;
    }
    let items = match result {
        Ok(rows) => Some(rows.iter().map(|a| adoption_item(a, session.user_id, ctx)).collect()),
        Err(e) => {
            warn!("adoptions load failed: {e}");
            None
        }
    };
    store.update::<AdoptionsState, _>(AdoptionsState::PATH, |s| {
        let current = s.cloned().unwrap_or_default();
        AdoptionsState {
            items: items.unwrap_or(current.items),
            loading: false,
            ..current
        }
    });
}

fn finish(store: &StateStore, error: Option<String>) {
    store.update::<AdoptionsState, _>(AdoptionsState::PATH, |s| AdoptionsState {
        busy: false,
        error,
        ..s.cloned().unwrap_or_default()
    });
}

/// Handle `adoptions/load`.
pub async fn handle_load(_req: AdoptionsLoadReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    load_listings(&store, &ctx).await;
}

/// Handle `adoption/create`. A listing needs at least the cat's name.
pub async fn handle_create(req: CreateAdoptionReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, CreateAdoptionReq::PATH) else {
        return;
    };
    let listing = NewAdoption {
        cat_name: req.listing.cat_name.trim().to_string(),
        ..req.listing
    };
    if listing.cat_name.is_empty() {
        finish(&store, Some("Cat name is required".into()));
        return;
    }
    store.update::<AdoptionsState, _>(AdoptionsState::PATH, |s| AdoptionsState {
        busy: true,
        error: None,
        ..s.cloned().unwrap_or_default()
    });

    let result = ctx.api.create_adoption(session.user_id, listing).await;
    if !still_current(&ctx, &session, "adoption listing") {
        return;
    }
    match result {
        Ok(()) => {
            info!(user_id = session.user_id, "adoption listed");
            finish(&store, None);
            load_listings(&store, &ctx).await;
        }
        Err(e) => {
            warn!("create adoption failed: {e}");
            finish(&store, Some(e.user_message()));
        }
    }
}

/// Handle `adoption/mark-adopted`. Only the owner closes a listing.
pub async fn handle_mark_adopted(req: MarkAdoptedReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let Some(session) = signed_in(&ctx, MarkAdoptedReq::PATH) else {
        return;
    };
    let allowed = store
        .get_as::<AdoptionsState>(AdoptionsState::PATH)
        .and_then(|s| s.items.into_iter().find(|a| a.adoption_id == req.adoption_id))
        .is_some_and(|a| a.can_mark_adopted);
    if !allowed {
        finish(&store, Some("Only the owner can mark this cat as adopted".into()));
        return;
    }

    let result = ctx
        .api
        .update_adoption_status(req.adoption_id, session.user_id, Adoption::ADOPTED)
        .await;
    if !still_current(&ctx, &session, "adoption status") {
        return;
    }
    match result {
        Ok(()) => {
            info!(adoption_id = req.adoption_id, "marked adopted");
            finish(&store, None);
            load_listings(&store, &ctx).await;
        }
        Err(e) => {
            warn!("mark adopted failed: {e}");
            finish(&store, Some(e.user_message()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::harness;
    use crate::testing::{Call, fixtures};
    use catpaw_client::ImageUpload;

    fn listing(name: &str) -> NewAdoption {
        NewAdoption {
            cat_name: name.into(),
            cat_age: "1".into(),
            cat_breed: "tabby".into(),
            description: "loves laps".into(),
            location: "Taipei".into(),
            contact_info: "tom@catpaw.app".into(),
            image: ImageUpload::new("mochi.jpg", vec![1]),
        }
    }

    #[tokio::test]
    async fn only_owner_of_open_listing_may_close_it() {
        let h = harness();
        {
            let mut rows = h.api.adoptions.lock().unwrap();
            rows.push(fixtures::adoption(1, 1, "Mochi"));
            rows.push(fixtures::adoption(2, 2, "Tofu"));
        }
        h.login_as_tom().await;
        h.flux.emit(AdoptionsLoadReq::PATH, AdoptionsLoadReq).await;

        let state = h.flux.get_as::<AdoptionsState>(AdoptionsState::PATH).unwrap();
        assert!(state.items[0].can_mark_adopted);
        assert!(!state.items[1].can_mark_adopted);
        assert_eq!(state.items[0].cat_age, "2");

        h.flux.emit(MarkAdoptedReq::PATH, MarkAdoptedReq { adoption_id: 2 }).await;
        assert_eq!(h.api.count(|c| matches!(c, Call::AdoptionStatus { .. })), 0);
        assert!(h.flux.get_as::<AdoptionsState>(AdoptionsState::PATH).unwrap().error.is_some());

        h.flux.emit(MarkAdoptedReq::PATH, MarkAdoptedReq { adoption_id: 1 }).await;
        assert!(h.api.calls().contains(&Call::AdoptionStatus {
            adoption_id: 1,
            user_id: 1,
            status: "adopted".into(),
        }));
        let state = h.flux.get_as::<AdoptionsState>(AdoptionsState::PATH).unwrap();
        assert!(!state.items[0].available);
        assert!(!state.items[0].can_mark_adopted);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn create_requires_name_then_reloads() {
        let h = harness();
        h.login_as_tom().await;

        h.flux.emit(CreateAdoptionReq::PATH, CreateAdoptionReq { listing: listing("  ") }).await;
        assert_eq!(h.api.count(|c| matches!(c, Call::CreateAdoption { .. })), 0);
        assert_eq!(
            h.flux.get_as::<AdoptionsState>(AdoptionsState::PATH).unwrap().error.as_deref(),
            Some("Cat name is required")
        );

        h.flux.emit(CreateAdoptionReq::PATH, CreateAdoptionReq { listing: listing("Mochi") }).await;
        let state = h.flux.get_as::<AdoptionsState>(AdoptionsState::PATH).unwrap();
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].cat_name, "Mochi");
        assert!(state.error.is_none());
        assert!(!state.busy);
    }
}
