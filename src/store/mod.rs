// src/store/mod.rs

//! Data-access contract for everything the service persists.
//!
//! Handlers and the achievement ledger receive an `Arc<dyn Store>` through
//! `AppState`; nothing reaches for a global pool. A uniqueness conflict is a
//! distinct `StoreError::AlreadyExists` so idempotent writers can branch on it.

pub mod memory;
pub mod postgres;
pub mod seed;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    badge::{Badge, EarnedBadge},
    challenge::{Challenge, CreateChallengeRequest},
    feedback::Feedback,
    journey::{CreateJourneyRequest, Journey},
    progress::{AchievementRecord, CompletionRecord},
    user::{Preferences, User},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record already exists")]
    AlreadyExists,

    #[error("Record not found")]
    NotFound,

    /// The write needs a signed-in user that exists.
    #[error("Not authorized")]
    Unauthorized,

    #[error("Store error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::AlreadyExists,
            // insufficient_privilege
            sqlx::Error::Database(db) if db.code().as_deref() == Some("42501") => {
                StoreError::Unauthorized
            }
            // The referenced account is gone; the caller has to sign in again.
            sqlx::Error::Database(db)
                if db.is_foreign_key_violation()
                    && db.constraint().is_some_and(|c| c.ends_with("_user_id_fkey")) =>
            {
                StoreError::Unauthorized
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => StoreError::NotFound,
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    // Users
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Stored preferences, or the defaults when the user never saved any.
    async fn get_preferences(&self, user_id: i64) -> Result<Preferences, StoreError>;
    async fn save_preferences(&self, user_id: i64, prefs: &Preferences)
    -> Result<(), StoreError>;

    // Journeys and challenges
    async fn list_journeys(&self) -> Result<Vec<Journey>, StoreError>;
    async fn get_journey(&self, id: i64) -> Result<Option<Journey>, StoreError>;
    async fn create_journey(&self, req: &CreateJourneyRequest) -> Result<Journey, StoreError>;

    /// Challenges of a journey in authoring order.
    async fn list_challenges(&self, journey_id: i64) -> Result<Vec<Challenge>, StoreError>;
    /// Fails with `NotFound` when the journey does not exist.
    async fn create_challenge(&self, req: &CreateChallengeRequest)
    -> Result<Challenge, StoreError>;
    async fn delete_challenge(&self, id: i64) -> Result<(), StoreError>;

    // Completion records, unique on (user_id, challenge_id)
    async fn find_completion(
        &self,
        user_id: i64,
        challenge_id: i64,
    ) -> Result<Option<CompletionRecord>, StoreError>;
    /// Fails with `AlreadyExists` when the pair is already recorded.
    async fn insert_completion(
        &self,
        user_id: i64,
        challenge_id: i64,
        xp_earned: i32,
    ) -> Result<CompletionRecord, StoreError>;
    async fn list_completions(&self, user_id: i64) -> Result<Vec<CompletionRecord>, StoreError>;

    // Achievement ledger row
    async fn get_achievements(&self, user_id: i64)
    -> Result<Option<AchievementRecord>, StoreError>;
    async fn upsert_achievements(&self, record: &AchievementRecord) -> Result<(), StoreError>;

    // Badges
    async fn list_badges(&self) -> Result<Vec<Badge>, StoreError>;
    async fn find_badge_by_name(&self, name: &str) -> Result<Option<Badge>, StoreError>;
    /// Fails with `AlreadyExists` when the user already holds the badge.
    async fn insert_user_badge(&self, user_id: i64, badge_id: i64) -> Result<(), StoreError>;
    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<EarnedBadge>, StoreError>;

    // Feedback
    async fn insert_feedback(
        &self,
        user_id: i64,
        challenge_id: Option<i64>,
        message: &str,
    ) -> Result<Feedback, StoreError>;
}
