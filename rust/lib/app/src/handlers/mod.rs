//! Request handlers and their Flux wiring.
//!
//! Every handler is a free `async fn(req, store, ctx)`. `register_handlers`
//! binds each to its request path, downcasting the payload on the way in.
//! Handlers catch API errors themselves: load failures leave the previous
//! list in place, mutation failures surface as a transient `error` string.

pub mod admin;
pub mod app;
pub mod auth;
pub mod chat;
pub mod comments;
pub mod convert;
pub mod events;
pub mod feed;
pub mod listings;
pub mod notifications;
pub mod profile;
pub mod stories;

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use catpaw_client::{CatPawApi, MediaResolver};
use catpaw_flux::{Flux, StateStore};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::optimistic::{KeepLocal, OptimisticToggler, ReconcilePolicy};
use crate::poller::PollHandle;
use crate::request::*;
use crate::session::{Session, SessionStore};
use self::stories::OpenStory;

/// Everything handlers share: the backend, the session and the live tasks.
pub struct CatPawContext {
    pub api: Arc<dyn CatPawApi>,
    pub session: SessionStore,
    pub config: AppConfig,
    pub media: MediaResolver,
    pub toggler: OptimisticToggler,
    chats: Mutex<HashMap<i64, PollHandle>>,
    story: Mutex<Option<OpenStory>>,
    story_seq: AtomicU64,
}

impl CatPawContext {
    /// Context with the default no-rollback toggle policy.
    pub fn new(api: Arc<dyn CatPawApi>, config: AppConfig) -> Self {
        Self::with_policy(api, config, Arc::new(KeepLocal))
    }

    pub fn with_policy(
        api: Arc<dyn CatPawApi>,
        config: AppConfig,
        policy: Arc<dyn ReconcilePolicy>,
    ) -> Self {
        Self {
            toggler: OptimisticToggler::new(Arc::clone(&api), policy),
            media: MediaResolver::new(config.upload_base()),
            api,
            session: SessionStore::new(),
            config,
            chats: Mutex::new(HashMap::new()),
            story: Mutex::new(None),
            story_seq: AtomicU64::new(0),
        }
    }

    /// Peers with a running chat poller.
    pub fn open_chats(&self) -> Vec<i64> {
        let mut peers: Vec<i64> = self.chats.lock().unwrap().keys().copied().collect();
        peers.sort_unstable();
        peers
    }

    /// A story sequence is showing and has not played out.
    pub fn has_open_story(&self) -> bool {
        self.story.lock().unwrap().as_ref().is_some_and(|s| !s.is_finished())
    }

    /// End the session and stop every repeating task.
    pub fn teardown(&self) {
        if let Some(session) = self.session.logout() {
            info!(user_id = session.user_id, "session ended");
        }
        let chats: Vec<PollHandle> = self.chats.lock().unwrap().drain().map(|(_, h)| h).collect();
        drop(chats);
        let story = self.story.lock().unwrap().take();
        drop(story);
        self.toggler.reset();
    }
}

/// Current session, or `None` with a debug note when signed out.
fn signed_in(ctx: &CatPawContext, path: &str) -> Option<Session> {
    let session = ctx.session.current();
    if session.is_none() {
        debug!(path, "ignored: not signed in");
    }
    session
}

/// Whether a result fetched under `session` may still be written.
fn still_current(ctx: &CatPawContext, session: &Session, what: &str) -> bool {
    let current = ctx.session.is_current(session.epoch);
    if !current {
        debug!("{what} arrived after logout, dropped");
    }
    current
}

/// Bind `handler` to `path`, downcasting the payload to `R`.
fn route<R, F, Fut>(flux: &Flux, path: &'static str, ctx: &Arc<CatPawContext>, handler: F)
where
    R: Any + Clone + Send + Sync,
    F: Fn(R, Arc<StateStore>, Arc<CatPawContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let ctx = Arc::clone(ctx);
    flux.on(path, move |path, payload, store| {
        let fut = payload
            .downcast_ref::<R>()
            .cloned()
            .map(|req| handler(req, store, Arc::clone(&ctx)));
        async move {
            match fut {
                Some(fut) => fut.await,
                None => warn!(%path, "unexpected payload type"),
            }
        }
    });
}

/// Register all handlers with a Flux instance.
pub fn register_handlers(flux: &Flux, ctx: Arc<CatPawContext>) {
    let ctx = &ctx;

    route(flux, InitializeReq::PATH, ctx, app::handle_initialize);

    route(flux, LoginReq::PATH, ctx, auth::handle_login);
    route(flux, SignupReq::PATH, ctx, auth::handle_signup);
    route(flux, LogoutReq::PATH, ctx, auth::handle_logout);

    route(flux, FeedLoadReq::PATH, ctx, feed::handle_load);
    route(flux, LikePostReq::PATH, ctx, feed::handle_like);
    route(flux, SavePostReq::PATH, ctx, feed::handle_save);
    route(flux, CreatePostReq::PATH, ctx, feed::handle_create);
    route(flux, DeletePostReq::PATH, ctx, feed::handle_delete);
    route(flux, SavedLoadReq::PATH, ctx, feed::handle_saved_load);

    route(flux, CommentsLoadReq::PATH, ctx, comments::handle_load);
    route(flux, AddCommentReq::PATH, ctx, comments::handle_add);
    route(flux, DeleteCommentReq::PATH, ctx, comments::handle_delete);

    route(flux, ProfileLoadReq::PATH, ctx, profile::handle_load);
    route(flux, ProfileUpdateReq::PATH, ctx, profile::handle_update);
    route(flux, FollowUserReq::PATH, ctx, profile::handle_follow);
    route(flux, SearchUsersReq::PATH, ctx, profile::handle_search);

    route(flux, StoriesLoadReq::PATH, ctx, stories::handle_tray_load);
    route(flux, StoryUploadReq::PATH, ctx, stories::handle_upload);
    route(flux, StoryOpenReq::PATH, ctx, stories::handle_open);
    route(flux, StoryPressReq::PATH, ctx, stories::handle_press);
    route(flux, StoryReleaseReq::PATH, ctx, stories::handle_release);
    route(flux, StoryTapReq::PATH, ctx, stories::handle_tap);
    route(flux, StoryCloseReq::PATH, ctx, stories::handle_close);

    route(flux, InboxLoadReq::PATH, ctx, chat::handle_inbox_load);
    route(flux, ChatOpenReq::PATH, ctx, chat::handle_open);
    route(flux, ChatSendReq::PATH, ctx, chat::handle_send);
    route(flux, ChatCloseReq::PATH, ctx, chat::handle_close);

    route(flux, AdoptionsLoadReq::PATH, ctx, listings::handle_load);
    route(flux, CreateAdoptionReq::PATH, ctx, listings::handle_create);
    route(flux, MarkAdoptedReq::PATH, ctx, listings::handle_mark_adopted);

    route(flux, EventsLoadReq::PATH, ctx, events::handle_load);
    route(flux, CreateEventReq::PATH, ctx, events::handle_create);
    route(flux, JoinEventReq::PATH, ctx, events::handle_join);

    route(flux, NotificationsLoadReq::PATH, ctx, notifications::handle_load);
    route(flux, MarkNotificationsReadReq::PATH, ctx, notifications::handle_mark_read);

    route(flux, AdminLoadReq::PATH, ctx, admin::handle_load);
    route(flux, AdminDeleteUserReq::PATH, ctx, admin::handle_delete_user);
    route(flux, AdminDeletePostReq::PATH, ctx, admin::handle_delete_post);
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::test_support::harness;
    use super::*;
    use crate::state::{AuthState, ChatState, FeedState, StoryView};
    use crate::story::StoryPhase;
    use crate::testing::{Call, fixtures};

    #[tokio::test]
    async fn feed_arriving_after_logout_is_dropped() {
        let h = harness();
        h.login_as_tom().await;
        h.api.posts.lock().unwrap().push(fixtures::post(5, 2, 0, false));

        h.api.hold("feed");
        let pending = tokio::spawn(feed::handle_load(
            FeedLoadReq,
            Arc::clone(h.flux.store()),
            Arc::clone(&h.ctx),
        ));
        h.api.wait_for(2, |c| matches!(c, Call::Feed(_))).await;

        h.flux.emit(LogoutReq::PATH, LogoutReq).await;
        h.api.release("feed");
        pending.await.unwrap();

        assert!(!h.flux.contains(FeedState::PATH));
        assert!(!h.flux.contains("posts/5/like"));
        assert!(h.flux.get_as::<AuthState>(AuthState::PATH).unwrap().user.is_none());
    }

    #[tokio::test]
    async fn fetch_from_replaced_session_is_dropped() {
        let h = harness();
        h.login_as_tom().await;
        h.api.posts.lock().unwrap().push(fixtures::post(5, 2, 0, false));

        h.api.hold("feed");
        let pending = tokio::spawn(feed::handle_load(
            FeedLoadReq,
            Arc::clone(h.flux.store()),
            Arc::clone(&h.ctx),
        ));
        h.api.wait_for(2, |c| *c == Call::Feed(1)).await;

        h.ctx.session.login(&fixtures::user(2, "root", "admin"));
        h.api.release("feed");
        pending.await.unwrap();

        let feed = h.flux.get_as::<FeedState>(FeedState::PATH).unwrap();
        assert!(feed.items.is_empty());
        assert!(!h.flux.contains("posts/5/like"));
    }

    #[tokio::test(start_paused = true)]
    async fn logout_stops_pollers_and_playback() {
        let h = harness();
        h.api.stories.lock().unwrap().insert(2, vec![fixtures::story(1, 2), fixtures::story(2, 2)]);
        h.login_as_tom().await;

        h.flux.emit(ChatOpenReq::PATH, ChatOpenReq { peer_id: 2 }).await;
        h.flux.emit(ChatOpenReq::PATH, ChatOpenReq { peer_id: 3 }).await;
        h.flux.emit(StoryOpenReq::PATH, StoryOpenReq { user_id: 2 }).await;
        assert_eq!(h.ctx.open_chats(), vec![2, 3]);
        assert!(h.ctx.has_open_story());

        h.flux.emit(LogoutReq::PATH, LogoutReq).await;
        assert!(h.ctx.open_chats().is_empty());
        assert!(!h.ctx.has_open_story());

        tokio::time::sleep(Duration::from_millis(10)).await;
        let polls = h.api.count(|c| matches!(c, Call::Messages { .. }));
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(h.api.count(|c| matches!(c, Call::Messages { .. })), polls);
        assert!(!h.flux.contains(&ChatState::path(2)));
        assert!(!h.flux.contains(StoryView::PATH));
    }

    #[tokio::test(start_paused = true)]
    async fn closing_during_story_load_abandons_it() {
        let h = harness();
        h.api.stories.lock().unwrap().insert(2, vec![fixtures::story(1, 2)]);
        h.login_as_tom().await;

        h.api.hold("user_stories");
        let pending = tokio::spawn(stories::handle_open(
            StoryOpenReq { user_id: 2 },
            Arc::clone(h.flux.store()),
            Arc::clone(&h.ctx),
        ));
        h.api.wait_for(1, |c| matches!(c, Call::UserStories(2))).await;

        h.flux.emit(StoryCloseReq::PATH, StoryCloseReq).await;
        pending.await.unwrap();
        h.api.release("user_stories");

        assert!(!h.ctx.has_open_story());
        let view = h.flux.get_as::<StoryView>(StoryView::PATH).unwrap();
        assert_eq!(view.phase, StoryPhase::Finished);
        assert!(view.items.is_empty());
    }

    #[tokio::test]
    async fn mismatched_payload_is_ignored() {
        let h = harness();
        h.flux.emit(LoginReq::PATH, "not a login").await;
        assert!(h.api.calls().is_empty());
        assert!(!h.flux.contains(AuthState::PATH));
    }
}
