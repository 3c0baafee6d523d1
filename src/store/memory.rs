// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::models::{
    badge::{BADGE_CATALOG, Badge, EarnedBadge},
    challenge::{Challenge, CreateChallengeRequest},
    feedback::Feedback,
    journey::{CreateJourneyRequest, Journey},
    progress::{AchievementRecord, CompletionRecord},
    user::{Preferences, User},
};

#[derive(Default)]
struct Tables {
    /// Per-table sequences, like `BIGSERIAL`.
    sequences: HashMap<&'static str, i64>,
    users: Vec<User>,
    preferences: HashMap<i64, Preferences>,
    journeys: Vec<Journey>,
    challenges: Vec<Challenge>,
    completions: Vec<CompletionRecord>,
    achievements: HashMap<i64, AchievementRecord>,
    badges: Vec<Badge>,
    user_badges: Vec<(i64, i64, chrono::DateTime<Utc>)>,
    feedback: Vec<Feedback>,
}

impl Tables {
    fn id(&mut self, table: &'static str) -> i64 {
        let next = self.sequences.entry(table).or_default();
        *next += 1;
        *next
    }

    /// Writes on behalf of a user that does not exist are refused, as the
    /// `users` foreign keys do in Postgres.
    fn require_user(&self, user_id: i64) -> Result<(), StoreError> {
        if self.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(StoreError::Unauthorized)
        }
    }
}

/// Process-local store with the same uniqueness rules as the Postgres schema.
/// Used when no `DATABASE_URL` is configured and by the test suites.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// An empty store holding only the badge catalog.
    pub fn new() -> Self {
        let mut tables = Tables::default();
        for (name, description, icon_name) in BADGE_CATALOG {
            let id = tables.id("badges");
            tables.badges.push(Badge {
                id,
                name: name.to_string(),
                description: description.to_string(),
                icon_name: icon_name.to_string(),
            });
        }

        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Number of stored completion records, across all users.
    pub async fn completion_count(&self) -> usize {
        self.tables.read().await.completions.len()
    }

    /// Number of badges held by `user_id`.
    pub async fn user_badge_count(&self, user_id: i64) -> usize {
        self.tables
            .read()
            .await
            .user_badges
            .iter()
            .filter(|(uid, _, _)| *uid == user_id)
            .count()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User, StoreError> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.username == username) {
            return Err(StoreError::AlreadyExists);
        }

        let user = User {
            id: t.id("users"),
            username: username.to_string(),
            password: password_hash.to_string(),
            role: role.to_string(),
            created_at: Some(Utc::now()),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.username == username).cloned())
    }

    async fn get_preferences(&self, user_id: i64) -> Result<Preferences, StoreError> {
        let t = self.tables.read().await;
        Ok(t.preferences.get(&user_id).cloned().unwrap_or_default())
    }

    async fn save_preferences(
        &self,
        user_id: i64,
        prefs: &Preferences,
    ) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        t.require_user(user_id)?;
        t.preferences.insert(user_id, prefs.clone());
        Ok(())
    }

    async fn list_journeys(&self) -> Result<Vec<Journey>, StoreError> {
        Ok(self.tables.read().await.journeys.clone())
    }

    async fn get_journey(&self, id: i64) -> Result<Option<Journey>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.journeys.iter().find(|j| j.id == id).cloned())
    }

    async fn create_journey(&self, req: &CreateJourneyRequest) -> Result<Journey, StoreError> {
        let mut t = self.tables.write().await;
        let journey = Journey {
            id: t.id("journeys"),
            title: req.title.clone(),
            description: req.description.clone(),
            difficulty: req.difficulty,
            created_at: Some(Utc::now()),
        };
        t.journeys.push(journey.clone());
        Ok(journey)
    }

    async fn list_challenges(&self, journey_id: i64) -> Result<Vec<Challenge>, StoreError> {
        let t = self.tables.read().await;
        Ok(t
            .challenges
            .iter()
            .filter(|c| c.journey_id == journey_id)
            .cloned()
            .collect())
    }

    async fn create_challenge(
        &self,
        req: &CreateChallengeRequest,
    ) -> Result<Challenge, StoreError> {
        let mut t = self.tables.write().await;
        if !t.journeys.iter().any(|j| j.id == req.journey_id) {
            return Err(StoreError::NotFound);
        }

        let challenge = Challenge {
            id: t.id("challenges"),
            journey_id: req.journey_id,
            title: req.title.clone(),
            description: req.description.clone(),
            difficulty: req.difficulty,
            xp_reward: req.xp_reward,
            body: req.body.clone(),
        };
        t.challenges.push(challenge.clone());
        Ok(challenge)
    }

    async fn delete_challenge(&self, id: i64) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        let before = t.challenges.len();
        t.challenges.retain(|c| c.id != id);
        if t.challenges.len() == before {
            return Err(StoreError::NotFound);
        }

        // Mirrors ON DELETE CASCADE / SET NULL in the schema.
        t.completions.retain(|c| c.challenge_id != id);
        for f in t.feedback.iter_mut().filter(|f| f.challenge_id == Some(id)) {
            f.challenge_id = None;
        }
        Ok(())
    }

    async fn find_completion(
        &self,
        user_id: i64,
        challenge_id: i64,
    ) -> Result<Option<CompletionRecord>, StoreError> {
        let t = self.tables.read().await;
        Ok(t
            .completions
            .iter()
            .find(|c| c.user_id == user_id && c.challenge_id == challenge_id)
            .cloned())
    }

    async fn insert_completion(
        &self,
        user_id: i64,
        challenge_id: i64,
        xp_earned: i32,
    ) -> Result<CompletionRecord, StoreError> {
        let mut t = self.tables.write().await;
        t.require_user(user_id)?;
        if !t.challenges.iter().any(|c| c.id == challenge_id) {
            return Err(StoreError::NotFound);
        }
        if t
            .completions
            .iter()
            .any(|c| c.user_id == user_id && c.challenge_id == challenge_id)
        {
            return Err(StoreError::AlreadyExists);
        }

        let record = CompletionRecord {
            id: t.id("user_progress"),
            user_id,
            challenge_id,
            xp_earned,
            completed_at: Utc::now(),
        };
        t.completions.push(record.clone());
        Ok(record)
    }

    async fn list_completions(&self, user_id: i64) -> Result<Vec<CompletionRecord>, StoreError> {
        let t = self.tables.read().await;
        Ok(t
            .completions
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_achievements(
        &self,
        user_id: i64,
    ) -> Result<Option<AchievementRecord>, StoreError> {
        Ok(self.tables.read().await.achievements.get(&user_id).cloned())
    }

    async fn upsert_achievements(&self, record: &AchievementRecord) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        t.require_user(record.user_id)?;
        t.achievements.insert(record.user_id, record.clone());
        Ok(())
    }

    async fn list_badges(&self) -> Result<Vec<Badge>, StoreError> {
        Ok(self.tables.read().await.badges.clone())
    }

    async fn find_badge_by_name(&self, name: &str) -> Result<Option<Badge>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.badges.iter().find(|b| b.name == name).cloned())
    }

    async fn insert_user_badge(&self, user_id: i64, badge_id: i64) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        t.require_user(user_id)?;
        if !t.badges.iter().any(|b| b.id == badge_id) {
            return Err(StoreError::NotFound);
        }
        if t
            .user_badges
            .iter()
            .any(|(uid, bid, _)| *uid == user_id && *bid == badge_id)
        {
            return Err(StoreError::AlreadyExists);
        }

        t.user_badges.push((user_id, badge_id, Utc::now()));
        Ok(())
    }

    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<EarnedBadge>, StoreError> {
        let t = self.tables.read().await;
        let earned = t
            .user_badges
            .iter()
            .filter(|(uid, _, _)| *uid == user_id)
            .filter_map(|(_, bid, earned_at)| {
                t.badges.iter().find(|b| b.id == *bid).map(|b| EarnedBadge {
                    id: b.id,
                    name: b.name.clone(),
                    description: b.description.clone(),
                    icon_name: b.icon_name.clone(),
                    earned_at: *earned_at,
                })
            })
            .collect();
        Ok(earned)
    }

    async fn insert_feedback(
        &self,
        user_id: i64,
        challenge_id: Option<i64>,
        message: &str,
    ) -> Result<Feedback, StoreError> {
        let mut t = self.tables.write().await;
        t.require_user(user_id)?;
        let feedback = Feedback {
            id: t.id("feedback"),
            user_id,
            challenge_id,
            message: message.to_string(),
            created_at: Utc::now(),
        };
        t.feedback.push(feedback.clone());
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_for_unknown_users_are_unauthorized() {
        let store = MemoryStore::new();

        assert!(matches!(
            store.insert_feedback(42, None, "hello").await,
            Err(StoreError::Unauthorized)
        ));
        assert!(matches!(
            store.save_preferences(42, &Preferences::default()).await,
            Err(StoreError::Unauthorized)
        ));

        let user = store.create_user("learner", "hash", "user").await.unwrap();
        assert!(store.insert_feedback(user.id, None, "hello").await.is_ok());
    }

    #[tokio::test]
    async fn test_ids_are_sequenced_per_table() {
        let store = MemoryStore::new();
        let user = store.create_user("learner", "hash", "user").await.unwrap();
        let badges = store.list_badges().await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(badges.first().map(|b| b.id), Some(1));
    }
}
