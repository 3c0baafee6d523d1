// src/models/progress.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'user_progress' table: one row per first-time correct completion.
/// Unique on `(user_id, challenge_id)`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub id: i64,
    pub user_id: i64,
    pub challenge_id: i64,
    pub xp_earned: i32,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// Represents the 'user_achievements' table, one row per user.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub user_id: i64,
    pub streak_count: i32,
    pub total_challenges_completed: i64,
    pub total_xp: i64,
    pub last_activity_date: Option<chrono::DateTime<chrono::Utc>>,
}

impl AchievementRecord {
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            streak_count: 0,
            total_challenges_completed: 0,
            total_xp: 0,
            last_activity_date: None,
        }
    }
}
