// src/handlers/feedback.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::feedback::CreateFeedbackRequest,
    store::Store,
    utils::{jwt::Claims, sanitize::plain_text},
};

/// Stores a learner's feedback, stripped of any markup.
pub async fn submit_feedback(
    State(store): State<Arc<dyn Store>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateFeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;
    let message = plain_text(&payload.message);
    if message.is_empty() {
        return Err(AppError::BadRequest("Feedback message is empty".to_string()));
    }

    let feedback = store
        .insert_feedback(user_id, payload.challenge_id, &message)
        .await?;
    tracing::info!(user_id, feedback_id = feedback.id, "Feedback received");

    Ok((StatusCode::CREATED, Json(feedback)))
}
