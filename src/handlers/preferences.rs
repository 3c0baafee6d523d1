// src/handlers/preferences.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    error::AppError,
    models::user::UpdatePreferencesRequest,
    store::Store,
    utils::jwt::Claims,
};

pub async fn get_preferences(
    State(store): State<Arc<dyn Store>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    Ok(Json(store.get_preferences(user_id).await?))
}

/// Partial update: fields left out of the body keep their stored value.
pub async fn update_preferences(
    State(store): State<Arc<dyn Store>>,
    Extension(claims): Extension<Claims>,
    Json(patch): Json<UpdatePreferencesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let prefs = store.get_preferences(user_id).await?.apply(patch);
    store.save_preferences(user_id, &prefs).await?;

    Ok(Json(prefs))
}
