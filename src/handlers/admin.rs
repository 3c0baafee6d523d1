// src/handlers/admin.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{challenge::CreateChallengeRequest, journey::CreateJourneyRequest},
    store::{Store, StoreError},
};

/// Creates a new journey.
/// Admin only.
pub async fn create_journey(
    State(store): State<Arc<dyn Store>>,
    Json(payload): Json<CreateJourneyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let journey = store.create_journey(&payload).await?;
    tracing::info!(journey_id = journey.id, "Journey created");

    Ok((StatusCode::CREATED, Json(journey)))
}

/// Creates a new challenge in an existing journey.
/// Admin only.
///
/// The body must be answerable: at least one correct option, key words and
/// highlights that occur in their text, and non-empty pair lists.
pub async fn create_challenge(
    State(store): State<Arc<dyn Store>>,
    Json(payload): Json<CreateChallengeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let challenge = store.create_challenge(&payload).await.map_err(|e| match e {
        StoreError::NotFound => {
            AppError::NotFound(format!("Journey {} not found", payload.journey_id))
        }
        other => AppError::from(other),
    })?;
    tracing::info!(
        challenge_id = challenge.id,
        journey_id = challenge.journey_id,
        kind = challenge.body.kind_name(),
        "Challenge created"
    );

    Ok((StatusCode::CREATED, Json(challenge)))
}

/// Deletes a challenge. Completion records for it go with it.
/// Admin only.
pub async fn delete_challenge(
    State(store): State<Arc<dyn Store>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    store.delete_challenge(id).await.map_err(|e| match e {
        StoreError::NotFound => AppError::NotFound(format!("Challenge {} not found", id)),
        other => AppError::from(other),
    })?;

    Ok(StatusCode::NO_CONTENT)
}
