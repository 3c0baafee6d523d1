// src/models/badge.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the static 'badges' catalog.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Badge {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon_name: String,
}

/// A badge joined with the moment the user earned it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EarnedBadge {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon_name: String,
    pub earned_at: chrono::DateTime<chrono::Utc>,
}

/// `(name, description, icon_name)` for every badge the ledger can award.
pub const BADGE_CATALOG: [(&str, &str, &str); 6] = [
    ("First Steps", "Completed your first challenge.", "footprints"),
    ("Journey Pioneer", "Completed 10 different challenges.", "compass"),
    ("Challenge Champion", "Completed 50 different challenges.", "trophy"),
    ("Perfect Score", "Nailed a 10 XP challenge.", "star"),
    ("Week Warrior", "Kept a 7 day streak.", "flame"),
    ("Monthly Master", "Kept a 30 day streak.", "crown"),
];
