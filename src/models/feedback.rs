// src/models/feedback.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'feedback' table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub user_id: i64,
    pub challenge_id: Option<i64>,
    pub message: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for sending feedback about the app or a specific challenge.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    pub challenge_id: Option<i64>,

    #[validate(length(
        min = 1,
        max = 2000,
        message = "Message length must be between 1 and 2000 chars"
    ))]
    pub message: String,
}
