// src/handlers/journey.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, models::journey::JourneyDetail, store::Store};

pub async fn list_journeys(
    State(store): State<Arc<dyn Store>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.list_journeys().await?))
}

/// A journey with its challenges. Answers and explanations are stripped.
pub async fn get_journey(
    State(store): State<Arc<dyn Store>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let journey = store
        .get_journey(id)
        .await?
        .ok_or(AppError::NotFound(format!("Journey {} not found", id)))?;

    let challenges = store
        .list_challenges(id)
        .await?
        .iter()
        .map(|c| c.to_public())
        .collect();

    Ok(Json(JourneyDetail {
        journey,
        challenges,
    }))
}
