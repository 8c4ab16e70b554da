//! Axum route handlers for the Mentor API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::Language;
use crate::llm_client::retry::Reply;
use crate::llm_client::turns::Tagged;
use crate::mentor::guidance::{ask, dream_path, normalise_interests};
use crate::mentor::prompts::INTEREST_CATALOG;
use crate::session::extractor::CurrentStudent;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Language code (`en`, `hi`, ...). Unknown or missing means English.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub request_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct DreamPathRequest {
    pub interests: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DreamPathResponse {
    pub interests: Vec<String>,
    #[serde(flatten)]
    pub reply: Reply,
}

#[derive(Debug, Serialize)]
pub struct LanguageOption {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MentorOptions {
    pub languages: Vec<LanguageOption>,
    pub interests: Vec<&'static str>,
}

fn language_of(code: Option<&str>) -> Language {
    code.map(Language::from_code).unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/mentor/ask
///
/// Empty questions are rejected before any model call. The reply is tagged with
/// its request id and flagged `superseded` if a newer question in the same
/// conversation was sent while this one was in flight.
pub async fn handle_ask(
    State(state): State<AppState>,
    student: CurrentStudent,
    Json(request): Json<AskRequest>,
) -> Result<Json<Tagged<Reply>>, AppError> {
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }

    let ticket = state
        .turns
        .begin(student.student_id, request.conversation_id, request.request_id);
    let language = language_of(request.language.as_deref());
    let reply = ask(&state.pipeline, &request.question, language).await;

    Ok(Json(state.turns.finish(ticket, reply)))
}

/// POST /api/v1/mentor/dream-path
pub async fn handle_dream_path(
    State(state): State<AppState>,
    _student: CurrentStudent,
    Json(request): Json<DreamPathRequest>,
) -> Result<Json<DreamPathResponse>, AppError> {
    let interests = normalise_interests(&request.interests)?;
    let language = language_of(request.language.as_deref());
    let reply = dream_path(&state.pipeline, &interests, language).await;

    Ok(Json(DreamPathResponse { interests, reply }))
}

/// GET /api/v1/mentor/options
pub async fn handle_options() -> Json<MentorOptions> {
    Json(MentorOptions {
        languages: Language::ALL
            .iter()
            .map(|l| LanguageOption {
                code: l.code(),
                name: l.native_name(),
            })
            .collect(),
        interests: INTEREST_CATALOG.to_vec(),
    })
}
