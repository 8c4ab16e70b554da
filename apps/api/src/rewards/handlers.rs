//! Axum route handlers for the Rewards API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::reward::{RedemptionRow, RewardRow};
use crate::rewards::progress::{progress_for, ProgressReport};
use crate::rewards::store::{checkout, list_redemptions, list_rewards, CheckoutReceipt};
use crate::session::auth::find_student;
use crate::session::extractor::CurrentStudent;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub reward_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct RewardsResponse {
    pub rewards: Vec<RewardRow>,
}

#[derive(Debug, Serialize)]
pub struct RedemptionsResponse {
    pub redemptions: Vec<RedemptionRow>,
}

/// GET /api/v1/rewards
///
/// Catalog, cheapest first.
pub async fn handle_list_rewards(State(state): State<AppState>) -> Result<Json<RewardsResponse>, AppError> {
    let rewards = list_rewards(&state.db).await?;
    Ok(Json(RewardsResponse { rewards }))
}

/// GET /api/v1/rewards/redemptions
pub async fn handle_list_redemptions(
    State(state): State<AppState>,
    student: CurrentStudent,
) -> Result<Json<RedemptionsResponse>, AppError> {
    let redemptions = list_redemptions(&state.db, student.student_id).await?;
    Ok(Json(RedemptionsResponse { redemptions }))
}

/// POST /api/v1/rewards/checkout
///
/// All-or-nothing: 422 when the cart costs more than the student's credits.
pub async fn handle_checkout(
    State(state): State<AppState>,
    student: CurrentStudent,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutReceipt>, AppError> {
    let receipt = checkout(&state.db, student.student_id, &request.reward_ids).await?;
    Ok(Json(receipt))
}

/// GET /api/v1/progress
pub async fn handle_progress(
    State(state): State<AppState>,
    student: CurrentStudent,
) -> Result<Json<ProgressReport>, AppError> {
    let row = find_student(&state.db, student.student_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {} not found", student.student_id)))?;
    Ok(Json(progress_for(&row)))
}
