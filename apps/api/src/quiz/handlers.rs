//! Axum route handlers for the Quiz API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::retry::Reply;
use crate::llm_client::turns::Tagged;
use crate::quiz::bank::{self, LevelSummary, QuestionView, LEVELS};
use crate::quiz::session::{QuizAction, QuizError, QuizEvent, QuizState};
use crate::quiz::tutor::{explain, tutor};
use crate::session::extractor::CurrentStudent;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LevelDetail {
    pub level: u8,
    pub title: &'static str,
    pub questions: Vec<QuestionView>,
    /// Starting state to send back with the first answer.
    pub state: QuizState,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub state: QuizState,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub state: QuizState,
    pub correct: bool,
    pub correct_answer: &'static str,
    pub explanation: Reply,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    pub state: QuizState,
    pub action: QuizAction,
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AdvanceEvent {
    Advanced,
    Completed { score: u32, percent: u32 },
    Restarted,
}

#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    pub state: QuizState,
    #[serde(flatten)]
    pub event: AdvanceEvent,
}

#[derive(Debug, Deserialize)]
pub struct TutorRequest {
    pub level: u8,
    pub question_index: usize,
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub request_id: Option<Uuid>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/quiz/levels
pub async fn handle_list_levels() -> Json<Vec<LevelSummary>> {
    Json(LEVELS.iter().map(|l| l.summary()).collect())
}

/// GET /api/v1/quiz/levels/:level
pub async fn handle_get_level(Path(number): Path<u8>) -> Result<Json<LevelDetail>, AppError> {
    let level = bank::level(number).ok_or(QuizError::UnknownLevel(number))?;
    Ok(Json(LevelDetail {
        level: level.number,
        title: level.title,
        questions: level.views(),
        state: QuizState::start(number)?,
    }))
}

/// POST /api/v1/quiz/answer
///
/// Scores the answer, then asks the tutor model to explain it. The explanation
/// is always present, degraded if the model is unreachable.
pub async fn handle_answer(
    State(state): State<AppState>,
    _student: CurrentStudent,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    if request.answer.trim().is_empty() {
        return Err(AppError::Validation("answer cannot be empty".to_string()));
    }

    let (next, event) = request.state.apply(QuizAction::Answer(request.answer.clone()))?;
    let QuizEvent::Answered { question, correct } = event else {
        return Err(AppError::Internal(anyhow::anyhow!(
            "answer action produced a non-answer event"
        )));
    };

    let explanation = explain(&state.pipeline, question, &request.answer, correct).await;

    Ok(Json(AnswerResponse {
        state: next,
        correct,
        correct_answer: question.answer,
        explanation,
    }))
}

/// POST /api/v1/quiz/advance
///
/// Moves to the next question or restarts the level. Answers go through
/// `/quiz/answer` so they always come with an explanation.
pub async fn handle_advance(Json(request): Json<AdvanceRequest>) -> Result<Json<AdvanceResponse>, AppError> {
    if matches!(request.action, QuizAction::Answer(_)) {
        return Err(AppError::Validation(
            "answers must be sent to /api/v1/quiz/answer".to_string(),
        ));
    }

    let (next, event) = request.state.apply(request.action)?;
    let event = match event {
        QuizEvent::Advanced => AdvanceEvent::Advanced,
        QuizEvent::Completed { score, percent } => AdvanceEvent::Completed { score, percent },
        QuizEvent::Restarted => AdvanceEvent::Restarted,
        QuizEvent::Answered { .. } => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "advance action produced an answer event"
            )))
        }
    };

    Ok(Json(AdvanceResponse { state: next, event }))
}

/// POST /api/v1/quiz/tutor
pub async fn handle_tutor(
    State(state): State<AppState>,
    student: CurrentStudent,
    Json(request): Json<TutorRequest>,
) -> Result<Json<Tagged<Reply>>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }
    let level = bank::level(request.level).ok_or(QuizError::UnknownLevel(request.level))?;
    let question = level.question(request.question_index).ok_or_else(|| {
        AppError::NotFound(format!(
            "Question {} not found in level {}",
            request.question_index, request.level
        ))
    })?;

    let ticket = state
        .turns
        .begin(student.student_id, request.conversation_id, request.request_id);
    let reply = tutor(&state.pipeline, question, &request.message).await;

    Ok(Json(state.turns.finish(ticket, reply)))
}
