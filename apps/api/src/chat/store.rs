use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::chat::ChatMessageRow;

const MESSAGE_COLUMNS: &str = "id, chat_id, sender_id, receiver_id, message, amount_funded, created_at";

/// One conversation as shown in the chat list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatSummary {
    pub chat_id: String,
    /// The other participant.
    pub counterpart_id: Uuid,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub message_count: usize,
    pub total_funded: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMessage {
    pub receiver_id: Uuid,
    pub message: String,
    #[serde(default)]
    pub amount_funded: Option<f64>,
}

impl NewMessage {
    pub fn validate(&self, sender_id: Uuid) -> Result<(), AppError> {
        if self.message.trim().is_empty() {
            return Err(AppError::Validation("message cannot be empty".to_string()));
        }
        if self.receiver_id == sender_id {
            return Err(AppError::Validation(
                "cannot send a message to yourself".to_string(),
            ));
        }
        match self.amount_funded {
            Some(amount) if !amount.is_finite() || amount < 0.0 => Err(AppError::Validation(
                "amount_funded must be zero or more".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Groups a student's messages into conversations, newest conversation first.
pub fn summarise_chats(student_id: Uuid, messages: Vec<ChatMessageRow>) -> Vec<ChatSummary> {
    let mut groups: HashMap<String, Vec<ChatMessageRow>> = HashMap::new();
    for message in messages {
        groups.entry(message.chat_id.clone()).or_default().push(message);
    }

    let mut summaries: Vec<ChatSummary> = groups
        .into_iter()
        .filter_map(|(chat_id, mut messages)| {
            messages.sort_by_key(|m| m.created_at);
            let last = messages.last()?;
            let counterpart_id = messages
                .iter()
                .map(|m| {
                    if m.sender_id == student_id {
                        m.receiver_id
                    } else {
                        m.sender_id
                    }
                })
                .find(|id| *id != student_id)
                .unwrap_or(last.receiver_id);
            Some(ChatSummary {
                chat_id,
                counterpart_id,
                last_message: last.message.clone(),
                last_message_at: last.created_at,
                message_count: messages.len(),
                total_funded: messages.iter().filter_map(|m| m.amount_funded).sum(),
            })
        })
        .collect();

    summaries.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
    summaries
}

pub async fn list_chats(db: &PgPool, student_id: Uuid) -> Result<Vec<ChatSummary>, AppError> {
    let messages = sqlx::query_as::<_, ChatMessageRow>(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM chat_messages \
         WHERE sender_id = $1 OR receiver_id = $1 ORDER BY created_at DESC"
    ))
    .bind(student_id)
    .fetch_all(db)
    .await?;
    Ok(summarise_chats(student_id, messages))
}

/// Oldest first. Only messages the student sent or received are visible.
pub async fn list_messages(db: &PgPool, chat_id: &str, student_id: Uuid) -> Result<Vec<ChatMessageRow>, AppError> {
    let messages = sqlx::query_as::<_, ChatMessageRow>(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM chat_messages \
         WHERE chat_id = $1 AND (sender_id = $2 OR receiver_id = $2) ORDER BY created_at ASC"
    ))
    .bind(chat_id)
    .bind(student_id)
    .fetch_all(db)
    .await?;
    Ok(messages)
}

pub async fn send_message(
    db: &PgPool,
    chat_id: &str,
    sender_id: Uuid,
    new: &NewMessage,
) -> Result<ChatMessageRow, AppError> {
    let row = sqlx::query_as::<_, ChatMessageRow>(&format!(
        "INSERT INTO chat_messages (chat_id, sender_id, receiver_id, message, amount_funded) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {MESSAGE_COLUMNS}"
    ))
    .bind(chat_id)
    .bind(sender_id)
    .bind(new.receiver_id)
    .bind(new.message.trim())
    .bind(new.amount_funded)
    .fetch_one(db)
    .await?;
    Ok(row)
}
