//! App start-up.

use std::sync::Arc;

use catpaw_flux::StateStore;

use crate::handlers::CatPawContext;
use crate::request::InitializeReq;
use crate::state::*;

/// Handle `app/initialize`.
pub async fn handle_initialize(_req: InitializeReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    match ctx.session.current() {
        Some(session) => {
            let avatar = ctx.media.resolve(session.profile_pic.as_deref());
            store.set(AuthState::PATH, AuthState::signed_in(&session, avatar));
            store.set(AppMenu::PATH, AppMenu::for_role(session.is_admin()));
            store.set(AppRoute::PATH, AppRoute(AppRoute::HOME.into()));
        }
        None => {
            store.set(AuthState::PATH, AuthState::signed_out());
            store.set(AppRoute::PATH, AppRoute(AppRoute::LOGIN.into()));
        }
    }
}
