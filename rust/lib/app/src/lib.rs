//! CatPaw app engine.
//!
//! Everything a CatPaw client does short of drawing pixels: screen state,
//! request handling, optimistic toggles, chat polling and story playback.
//! A shell emits requests (`crate::request`) and renders the state it
//! finds at well-known paths (`crate::state`).
//!
//! ```ignore
//! let app = CatPawApp::new(Arc::new(HttpApi::new(&config.api_base_url)), config);
//! app.emit(LoginReq::PATH, LoginReq { email, password }).await;
//! let feed = app.flux().get_as::<FeedState>(FeedState::PATH);
//! ```

pub mod config;
pub mod handlers;
pub mod optimistic;
pub mod poller;
pub mod request;
pub mod session;
pub mod state;
pub mod story;
pub mod timefmt;

#[cfg(test)]
mod testing;

use std::any::Any;
use std::sync::Arc;

use catpaw_client::CatPawApi;
use catpaw_flux::Flux;

pub use config::{AppConfig, ConfigError};
pub use handlers::CatPawContext;
pub use optimistic::{KeepLocal, ReconcilePolicy, RollbackOnFailure, ToggleState};
pub use session::{Role, Session, SessionStore};

/// A Flux instance wired to every CatPaw handler.
pub struct CatPawApp {
    flux: Flux,
    ctx: Arc<CatPawContext>,
}

impl CatPawApp {
    pub fn new(api: Arc<dyn CatPawApi>, config: AppConfig) -> Self {
        Self::from_context(CatPawContext::new(api, config))
    }

    /// Like [`new`](Self::new) with a custom toggle failure policy.
    pub fn with_policy(
        api: Arc<dyn CatPawApi>,
        config: AppConfig,
        policy: Arc<dyn ReconcilePolicy>,
    ) -> Self {
        Self::from_context(CatPawContext::with_policy(api, config, policy))
    }

    fn from_context(ctx: CatPawContext) -> Self {
        let ctx = Arc::new(ctx);
        let flux = Flux::new();
        handlers::register_handlers(&flux, Arc::clone(&ctx));
        Self { flux, ctx }
    }

    pub fn flux(&self) -> &Flux {
        &self.flux
    }

    pub fn context(&self) -> &Arc<CatPawContext> {
        &self.ctx
    }

    /// Emit a request and wait for its handler.
    pub async fn emit<T: Any + Send + Sync>(&self, path: &str, payload: T) {
        self.flux.emit(path, payload).await;
    }
}

impl Drop for CatPawApp {
    fn drop(&mut self) {
        self.ctx.teardown();
    }
}
