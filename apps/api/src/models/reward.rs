use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RewardRow {
    pub id: Uuid,
    pub title: String,
    pub reward_type: Option<String>,
    pub cost: i32,
    pub sponsor_id: Option<Uuid>,
    pub local_only: bool,
}

/// A redemption joined with the reward it bought.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RedemptionRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub reward_id: Uuid,
    pub reward_title: String,
    pub reward_cost: i32,
    pub status: String,
    pub redeemed_at: DateTime<Utc>,
}
