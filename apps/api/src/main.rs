mod career;
mod chat;
mod config;
mod db;
mod errors;
mod llm_client;
mod mentor;
mod models;
mod quiz;
mod rewards;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::retry::{Pipeline, RetryPolicy, TokioDelay};
use crate::llm_client::turns::TurnTracker;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::session::RedisSessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mentor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    info!("Database migrations applied");

    // Initialize Redis-backed sessions
    let redis = redis::Client::open(config.redis_url.clone())?;
    let sessions = Arc::new(RedisSessionStore::new(redis));
    info!("Redis session store initialized");

    // Initialize the generation pipeline
    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_url.clone(),
        config.llm_timeout,
    )?;
    let policy = RetryPolicy {
        max_attempts: config.llm_max_attempts,
        base_delay: config.llm_retry_base,
    };
    let pipeline = Pipeline::new(Arc::new(gemini), policy, Arc::new(TokioDelay));
    info!(
        "LLM pipeline initialized (model: {}, attempts: {}, timeout: {}s)",
        llm_client::MODEL,
        policy.max_attempts,
        config.llm_timeout.as_secs()
    );

    // Build app state
    let state = AppState {
        db,
        sessions,
        pipeline,
        turns: TurnTracker::new(),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the app's web domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
