//! Axum route handlers for the Career API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::career::models::{CareerPathway, CareerRoadmap};
use crate::career::pathway::{plan_pathway, plan_roadmap, PathwayProfile, Planned};
use crate::errors::AppError;
use crate::session::extractor::CurrentStudent;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RoadmapRequest {
    pub input: String,
}

/// POST /api/v1/career/pathway
///
/// Always returns a complete pathway; `source` says whether it came from the model
/// or is the built-in default.
pub async fn handle_pathway(
    State(state): State<AppState>,
    _student: CurrentStudent,
    Json(profile): Json<PathwayProfile>,
) -> Result<Json<Planned<CareerPathway>>, AppError> {
    profile.validate()?;
    Ok(Json(plan_pathway(&state.pipeline, &profile).await))
}

/// POST /api/v1/career/roadmap
pub async fn handle_roadmap(
    State(state): State<AppState>,
    _student: CurrentStudent,
    Json(request): Json<RoadmapRequest>,
) -> Result<Json<Planned<CareerRoadmap>>, AppError> {
    if request.input.trim().is_empty() {
        return Err(AppError::Validation("input cannot be empty".to_string()));
    }
    Ok(Json(plan_roadmap(&state.pipeline, &request.input).await))
}
