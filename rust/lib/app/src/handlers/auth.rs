//! Login, signup and logout.

use std::sync::Arc;

use catpaw_flux::StateStore;
use tracing::{info, warn};

use crate::handlers::{CatPawContext, feed};
use crate::request::*;
use crate::state::*;

/// Handle `auth/login`.
pub async fn handle_login(req: LoginReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        store.set(AuthState::PATH, AuthState::failed("Please enter email and password".into()));
        return;
    }

    // A second login replaces whoever was signed in.
    if ctx.session.current().is_some() {
        ctx.teardown();
        store.clear();
    }

    store.set(AuthState::PATH, AuthState::busy());

    match ctx.api.login(email, &req.password).await {
        Ok(user) => {
            let session = ctx.session.login(&user);
            info!(user_id = session.user_id, admin = session.is_admin(), "logged in");
            let avatar = ctx.media.resolve(session.profile_pic.as_deref());
            store.set(AuthState::PATH, AuthState::signed_in(&session, avatar));
            store.set(AppMenu::PATH, AppMenu::for_role(session.is_admin()));
            store.set(AppRoute::PATH, AppRoute(AppRoute::HOME.into()));
            feed::load_feed(&store, &ctx).await;
        }
        Err(e) => {
            warn!("login failed: {e}");
            store.set(AuthState::PATH, AuthState::failed(e.user_message()));
        }
    }
}

/// Handle `auth/signup`: register, then log in with the same credentials.
pub async fn handle_signup(req: SignupReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    if [&req.username, &req.email, &req.password, &req.full_name]
        .iter()
        .any(|f| f.trim().is_empty())
    {
        store.set(SignupState::PATH, SignupState {
            error: Some("Please fill in all fields".into()),
            ..SignupState::default()
        });
        return;
    }

    store.set(SignupState::PATH, SignupState { busy: true, ..SignupState::default() });

    let registered = ctx
        .api
        .register(req.username.trim(), req.email.trim(), &req.password, req.full_name.trim())
        .await;
    match registered {
        Ok(()) => {
            info!(username = %req.username, "registered");
            store.set(SignupState::PATH, SignupState { done: true, ..SignupState::default() });
            let login = LoginReq { email: req.email, password: req.password };
            handle_login(login, store, ctx).await;
        }
        Err(e) => {
            warn!("signup failed: {e}");
            store.set(SignupState::PATH, SignupState {
                error: Some(e.user_message()),
                ..SignupState::default()
            });
        }
    }
}

/// Handle `auth/logout`: stop everything, forget all screen state.
pub async fn handle_logout(_req: LogoutReq, store: Arc<StateStore>, ctx: Arc<CatPawContext>) {
    ctx.teardown();
    store.clear();
    store.set(AuthState::PATH, AuthState::signed_out());
    store.set(AppRoute::PATH, AppRoute(AppRoute::LOGIN.into()));
}
