//! Reward catalog, redemption log and checkout queries.

use std::collections::HashSet;

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::reward::{RedemptionRow, RewardRow};

/// How many redemptions the history view shows.
pub const REDEMPTION_HISTORY_LIMIT: i64 = 10;

const REDEMPTION_COLUMNS: &str = "r.id, r.student_id, r.reward_id, w.title AS reward_title, \
    w.cost AS reward_cost, r.status, r.redeemed_at";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("cart is empty")]
    Empty,
    #[error("reward {0} is in the cart twice")]
    Duplicate(Uuid),
    #[error("reward {0} does not exist")]
    UnknownReward(Uuid),
    #[error("Insufficient Credits: you need {short_by} more credits for this purchase")]
    InsufficientCredits { total: i64, short_by: i64 },
}

impl From<CartError> for AppError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::Empty | CartError::Duplicate(_) => AppError::Validation(e.to_string()),
            CartError::UnknownReward(_) => AppError::NotFound(e.to_string()),
            CartError::InsufficientCredits { .. } => AppError::UnprocessableEntity(e.to_string()),
        }
    }
}

/// Checks a cart against the catalog rows it refers to and the student's balance.
/// Returns the total cost.
pub fn price_cart(reward_ids: &[Uuid], rewards: &[RewardRow], credits: i64) -> Result<i64, CartError> {
    if reward_ids.is_empty() {
        return Err(CartError::Empty);
    }
    let mut seen = HashSet::with_capacity(reward_ids.len());
    let mut total: i64 = 0;
    for id in reward_ids {
        if !seen.insert(*id) {
            return Err(CartError::Duplicate(*id));
        }
        let reward = rewards
            .iter()
            .find(|r| r.id == *id)
            .ok_or(CartError::UnknownReward(*id))?;
        total += i64::from(reward.cost);
    }
    if total > credits {
        return Err(CartError::InsufficientCredits {
            total,
            short_by: total - credits,
        });
    }
    Ok(total)
}

pub async fn list_rewards(db: &PgPool) -> Result<Vec<RewardRow>, AppError> {
    let rewards = sqlx::query_as::<_, RewardRow>(
        "SELECT id, title, reward_type, cost, sponsor_id, local_only FROM rewards ORDER BY cost ASC, title ASC",
    )
    .fetch_all(db)
    .await?;
    Ok(rewards)
}

/// Most recent redemptions first.
pub async fn list_redemptions(db: &PgPool, student_id: Uuid) -> Result<Vec<RedemptionRow>, AppError> {
    let redemptions = sqlx::query_as::<_, RedemptionRow>(&format!(
        "SELECT {REDEMPTION_COLUMNS} FROM redemptions r JOIN rewards w ON w.id = r.reward_id \
         WHERE r.student_id = $1 ORDER BY r.redeemed_at DESC LIMIT $2"
    ))
    .bind(student_id)
    .bind(REDEMPTION_HISTORY_LIMIT)
    .fetch_all(db)
    .await?;
    Ok(redemptions)
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub redemption_ids: Vec<Uuid>,
    pub total_cost: i64,
    pub remaining_credits: i64,
}

/// Redeems every reward in the cart or none of them. The student row is locked
/// for the duration so two checkouts cannot spend the same credits.
pub async fn checkout(db: &PgPool, student_id: Uuid, reward_ids: &[Uuid]) -> Result<CheckoutReceipt, AppError> {
    if reward_ids.is_empty() {
        return Err(CartError::Empty.into());
    }

    let mut tx = db.begin().await?;

    let credits: Option<i32> = sqlx::query_scalar::<_, Option<i32>>(
        "SELECT monthly_credits FROM students WHERE id = $1 FOR UPDATE",
    )
    .bind(student_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Student {student_id} not found")))?;
    let credits = i64::from(credits.unwrap_or(0));

    let rewards = sqlx::query_as::<_, RewardRow>(
        "SELECT id, title, reward_type, cost, sponsor_id, local_only FROM rewards WHERE id = ANY($1)",
    )
    .bind(reward_ids)
    .fetch_all(&mut *tx)
    .await?;

    let total = price_cart(reward_ids, &rewards, credits)?;

    let mut redemption_ids = Vec::with_capacity(reward_ids.len());
    for reward_id in reward_ids {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO redemptions (student_id, reward_id, status) VALUES ($1, $2, 'pending') RETURNING id",
        )
        .bind(student_id)
        .bind(reward_id)
        .fetch_one(&mut *tx)
        .await?;
        redemption_ids.push(id);
    }

    let remaining: i32 = sqlx::query_scalar(
        "UPDATE students SET monthly_credits = COALESCE(monthly_credits, 0) - $2, \
         redeemed_this_month = COALESCE(redeemed_this_month, 0) + $2 \
         WHERE id = $1 RETURNING monthly_credits",
    )
    .bind(student_id)
    .bind(i32::try_from(total).map_err(|e| AppError::Internal(e.into()))?)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(
        "Student {student_id} redeemed {} reward(s) for {total} credits",
        redemption_ids.len()
    );

    Ok(CheckoutReceipt {
        redemption_ids,
        total_cost: total,
        remaining_credits: i64::from(remaining),
    })
}
