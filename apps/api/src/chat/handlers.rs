//! Axum route handlers for the Chat API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::chat::store::{list_chats, list_messages, send_message, ChatSummary, NewMessage};
use crate::errors::AppError;
use crate::models::chat::ChatMessageRow;
use crate::session::extractor::CurrentStudent;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ChatsResponse {
    pub chats: Vec<ChatSummary>,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub chat_id: String,
    pub messages: Vec<ChatMessageRow>,
}

/// GET /api/v1/chats
pub async fn handle_list_chats(
    State(state): State<AppState>,
    student: CurrentStudent,
) -> Result<Json<ChatsResponse>, AppError> {
    let chats = list_chats(&state.db, student.student_id).await?;
    Ok(Json(ChatsResponse { chats }))
}

/// GET /api/v1/chats/:chat_id/messages
pub async fn handle_list_messages(
    State(state): State<AppState>,
    student: CurrentStudent,
    Path(chat_id): Path<String>,
) -> Result<Json<MessagesResponse>, AppError> {
    let messages = list_messages(&state.db, &chat_id, student.student_id).await?;
    if messages.is_empty() {
        return Err(AppError::NotFound(format!("Chat {chat_id} not found")));
    }
    Ok(Json(MessagesResponse { chat_id, messages }))
}

/// POST /api/v1/chats/:chat_id/messages
pub async fn handle_send_message(
    State(state): State<AppState>,
    student: CurrentStudent,
    Path(chat_id): Path<String>,
    Json(new): Json<NewMessage>,
) -> Result<(StatusCode, Json<ChatMessageRow>), AppError> {
    if chat_id.trim().is_empty() {
        return Err(AppError::Validation("chat_id cannot be empty".to_string()));
    }
    new.validate(student.student_id)?;

    let row = send_message(&state.db, &chat_id, student.student_id, &new).await?;
    Ok((StatusCode::CREATED, Json(row)))
}
