// src/handlers/auth.rs

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    ledger::AchievementLedger,
    models::user::{CreateUserRequest, LoginRequest},
    store::{Store, StoreError},
    utils::{
        jwt::sign_jwt,
        password::{hash_password, verify_password},
    },
};

/// Registers a new learner.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(store): State<Arc<dyn Store>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let user = store
        .create_user(&payload.username, &hashed_password, "user")
        .await
        .map_err(|e| match e {
            StoreError::AlreadyExists => {
                AppError::Conflict(format!("Username '{}' already exists", payload.username))
            }
            other => {
                tracing::error!("Failed to register user: {:?}", other);
                AppError::from(other)
            }
        })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a learner and returns a JWT token.
///
/// A successful login counts as activity for the daily streak.
pub async fn login(
    State(store): State<Arc<dyn Store>>,
    State(config): State<Config>,
    State(ledger): State<AchievementLedger>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = store
        .find_user_by_username(&payload.username)
        .await?
        .ok_or(AppError::AuthError("Invalid username or password".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Invalid username or password".to_string()));
    }

    let token = sign_jwt(&user, &config.jwt_secret, config.jwt_expiration)?;
    let streak = ledger.on_activity(user.id, Utc::now()).await;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "role": user.role,
        "streak": streak,
    })))
}
