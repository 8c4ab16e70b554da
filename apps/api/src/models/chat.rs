use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessageRow {
    pub id: Uuid,
    pub chat_id: String,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub message: String,
    pub amount_funded: Option<f64>,
    pub created_at: DateTime<Utc>,
}
