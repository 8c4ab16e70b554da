use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::db;
use crate::llm_client;
use crate::state::AppState;

/// GET /health
/// Returns service status, version, and whether the database answers.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database_ok = db::ping(&state.db).await;
    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database_ok { "ok" } else { "degraded" },
            "version": env!("CARGO_PKG_VERSION"),
            "service": "mentor-api",
            "model": llm_client::MODEL,
            "database": database_ok,
        })),
    )
}
