// src/handlers/achievements.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{error::AppError, ledger::AchievementLedger, store::Store, utils::jwt::Claims};

/// Totals, streak and earned badges of the signed-in learner.
pub async fn my_achievements(
    State(ledger): State<AchievementLedger>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    Ok(Json(ledger.summary(user_id).await?))
}

/// The full badge catalog.
pub async fn list_badges(
    State(store): State<Arc<dyn Store>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.list_badges().await?))
}
