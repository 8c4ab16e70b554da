//! Axum route handlers for login, session restore and logout.

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::student::StudentRow;
use crate::session::auth::{find_student, verify_credentials, LoginRequest};
use crate::session::extractor::bearer_token;
use crate::session::{resolve_token, SessionToken, TokenState};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in_secs: u64,
    pub student: StudentRow,
}

#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    pub authenticated: bool,
    /// The client should delete the token it presented.
    pub purge_token: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentRow>,
}

impl RestoreResponse {
    fn anonymous(purge_token: bool) -> Self {
        Self {
            authenticated: false,
            purge_token,
            student: None,
        }
    }
}

/// POST /api/v1/session
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let identity = request.identity()?;

    let student = verify_credentials(&state.db, &identity, &request.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let token = SessionToken::generate();
    state
        .sessions
        .put(&token, student.id, state.config.session_ttl_secs)
        .await?;
    info!("Student {} logged in", student.id);

    Ok(Json(LoginResponse {
        token: token.to_string(),
        expires_in_secs: state.config.session_ttl_secs,
        student,
    }))
}

/// GET /api/v1/session
///
/// Re-establishes identity on app start from the stored token. Never 401s: an
/// unusable token comes back as `purge_token: true`.
pub async fn handle_restore(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RestoreResponse>, AppError> {
    let (token, student_id) = match resolve_token(state.sessions.as_ref(), bearer_token(&headers)).await? {
        TokenState::Missing => return Ok(Json(RestoreResponse::anonymous(false))),
        TokenState::Malformed | TokenState::Unknown(_) => {
            return Ok(Json(RestoreResponse::anonymous(true)))
        }
        TokenState::Active(token, student_id) => (token, student_id),
    };

    let Some(student) = find_student(&state.db, student_id).await? else {
        state.sessions.remove(&token).await?;
        return Ok(Json(RestoreResponse::anonymous(true)));
    };

    // sliding expiry
    state
        .sessions
        .put(&token, student.id, state.config.session_ttl_secs)
        .await?;

    Ok(Json(RestoreResponse {
        authenticated: true,
        purge_token: false,
        student: Some(student),
    }))
}

/// DELETE /api/v1/session
///
/// Idempotent: logging out with a missing or stale token still succeeds.
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    match resolve_token(state.sessions.as_ref(), bearer_token(&headers)).await? {
        TokenState::Active(token, _) | TokenState::Unknown(token) => {
            state.sessions.remove(&token).await?;
        }
        TokenState::Missing | TokenState::Malformed => {}
    }
    Ok(StatusCode::NO_CONTENT)
}
