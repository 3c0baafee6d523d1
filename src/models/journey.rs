// src/models/journey.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::challenge::{Difficulty, PublicChallenge};

/// A named, ordered collection of challenges grouped by theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journey {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A journey together with its challenges, answers hidden.
#[derive(Debug, Serialize)]
pub struct JourneyDetail {
    #[serde(flatten)]
    pub journey: Journey,
    pub challenges: Vec<PublicChallenge>,
}

/// DTO for creating a new journey.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJourneyRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title length must be between 1 and 100 chars"
    ))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: String,

    pub difficulty: Difficulty,
}
