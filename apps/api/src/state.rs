use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::retry::Pipeline;
use crate::llm_client::turns::TurnTracker;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Token → student mapping. Redis in production.
    pub sessions: Arc<dyn SessionStore>,
    /// Generator + retry policy used by every AI call site.
    pub pipeline: Pipeline,
    pub turns: TurnTracker,
    pub config: Config,
}
