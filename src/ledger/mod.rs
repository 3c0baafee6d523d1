// src/ledger/mod.rs

//! XP totals, daily streaks and badge unlocks.
//!
//! The ledger is the only writer of `user_achievements` and `user_badges`.
//! Gamification state is advisory: the `on_*` entry points log and swallow
//! every store failure so a learner is never held up by bookkeeping.

pub mod checker;
pub mod streak;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::{
        badge::EarnedBadge,
        progress::{AchievementRecord, CompletionRecord},
    },
    session::CompletionEvent,
    store::{Store, StoreError},
};

use self::checker::{check_completion_badges, check_streak_badges};
use self::streak::{StreakChange, next_streak};

/// Result of `record_completion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    pub success: bool,
    pub already_completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    Awarded,
    AlreadyEarned,
}

#[derive(Debug, Clone, Serialize)]
pub struct AchievementUpdate {
    pub total_challenges_completed: i64,
    pub total_xp: i64,
    pub badges_awarded: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreakUpdate {
    pub streak_count: i32,
    pub change: StreakChange,
    pub badges_awarded: Vec<String>,
}

/// What the learner gets to see after passing a challenge.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionSummary {
    pub already_completed: bool,
    pub xp_earned: i32,
    pub totals: Option<AchievementUpdate>,
    pub streak: Option<StreakUpdate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerSummary {
    #[serde(flatten)]
    pub achievements: AchievementRecord,
    pub badges: Vec<EarnedBadge>,
}

#[derive(Clone)]
pub struct AchievementLedger {
    store: Arc<dyn Store>,
}

impl AchievementLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Records a first-time completion. A repeat, including one that loses an insert
    /// race against another session, reports `already_completed` and writes nothing.
    pub async fn record_completion(
        &self,
        user_id: i64,
        challenge_id: i64,
        xp: i32,
    ) -> Result<RecordOutcome, StoreError> {
        let already = RecordOutcome {
            success: true,
            already_completed: true,
        };

        if self
            .store
            .find_completion(user_id, challenge_id)
            .await?
            .is_some()
        {
            return Ok(already);
        }

        match self.store.insert_completion(user_id, challenge_id, xp).await {
            Ok(_) => Ok(RecordOutcome {
                success: true,
                already_completed: false,
            }),
            Err(StoreError::AlreadyExists) => {
                tracing::debug!(user_id, challenge_id, "Completion already recorded concurrently");
                Ok(already)
            }
            Err(e) => Err(e),
        }
    }

    /// Recomputes totals from the completion rows and awards milestone badges.
    pub async fn update_achievements(&self, user_id: i64) -> Result<AchievementUpdate, StoreError> {
        let completions = self.store.list_completions(user_id).await?;
        let total_xp: i64 = completions.iter().map(|c| i64::from(c.xp_earned)).sum();

        let mut record = self
            .store
            .get_achievements(user_id)
            .await?
            .unwrap_or_else(|| AchievementRecord::empty(user_id));
        record.total_challenges_completed = completions.len() as i64;
        record.total_xp = total_xp;
        self.store.upsert_achievements(&record).await?;

        let badges_awarded = self.award_due(user_id, &completions, None).await?;

        Ok(AchievementUpdate {
            total_challenges_completed: record.total_challenges_completed,
            total_xp,
            badges_awarded,
        })
    }

    /// Applies the daily streak rule for an activity at `now`.
    pub async fn check_and_update_streak(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<StreakUpdate, StoreError> {
        let mut record = self
            .store
            .get_achievements(user_id)
            .await?
            .unwrap_or_else(|| AchievementRecord::empty(user_id));

        let (streak_count, change) =
            next_streak(record.streak_count, record.last_activity_date, now);

        if change != StreakChange::Unchanged {
            record.streak_count = streak_count;
            record.last_activity_date = Some(now);
            self.store.upsert_achievements(&record).await?;
        }

        let badges_awarded = self.award_due(user_id, &[], Some(streak_count)).await?;

        Ok(StreakUpdate {
            streak_count,
            change,
            badges_awarded,
        })
    }

    /// Awards a badge by name. Holding it already is a no-op, not an error.
    pub async fn award_badge(
        &self,
        user_id: i64,
        badge_name: &str,
    ) -> Result<AwardOutcome, StoreError> {
        let badge = self
            .store
            .find_badge_by_name(badge_name)
            .await?
            .ok_or(StoreError::NotFound)?;

        match self.store.insert_user_badge(user_id, badge.id).await {
            Ok(()) => {
                tracing::info!(user_id, badge = badge_name, "Badge awarded");
                Ok(AwardOutcome::Awarded)
            }
            Err(StoreError::AlreadyExists) => Ok(AwardOutcome::AlreadyEarned),
            Err(e) => Err(e),
        }
    }

    pub async fn summary(&self, user_id: i64) -> Result<LedgerSummary, StoreError> {
        let achievements = self
            .store
            .get_achievements(user_id)
            .await?
            .unwrap_or_else(|| AchievementRecord::empty(user_id));
        let badges = self.store.list_user_badges(user_id).await?;

        Ok(LedgerSummary {
            achievements,
            badges,
        })
    }

    /// Bookkeeping after a correct answer. Never fails; `None` means nothing was recorded.
    pub async fn on_challenge_completed(
        &self,
        user_id: i64,
        event: CompletionEvent,
        now: DateTime<Utc>,
    ) -> Option<CompletionSummary> {
        let recorded = match self
            .record_completion(user_id, event.challenge_id, event.xp)
            .await
        {
            Ok(recorded) => recorded,
            Err(e) => {
                tracing::warn!(
                    user_id,
                    challenge_id = event.challenge_id,
                    "Failed to record completion: {}",
                    e
                );
                return None;
            }
        };

        let totals = if recorded.already_completed {
            None
        } else {
            self.update_achievements(user_id)
                .await
                .map_err(|e| tracing::warn!(user_id, "Failed to update achievements: {}", e))
                .ok()
        };

        Some(CompletionSummary {
            already_completed: recorded.already_completed,
            xp_earned: if recorded.already_completed { 0 } else { event.xp },
            totals,
            streak: self.on_activity(user_id, now).await,
        })
    }

    /// Streak check for a login or a session start. Failures are logged and dropped.
    pub async fn on_activity(&self, user_id: i64, now: DateTime<Utc>) -> Option<StreakUpdate> {
        self.check_and_update_streak(user_id, now)
            .await
            .map_err(|e| tracing::warn!(user_id, "Failed to update streak: {}", e))
            .ok()
    }

    /// Badge evaluation when a learner finishes a whole journey.
    pub async fn on_journey_completed(&self, user_id: i64) -> Option<AchievementUpdate> {
        self.update_achievements(user_id)
            .await
            .map_err(|e| tracing::warn!(user_id, "Failed to evaluate journey badges: {}", e))
            .ok()
    }

    async fn award_due(
        &self,
        user_id: i64,
        completions: &[CompletionRecord],
        streak: Option<i32>,
    ) -> Result<Vec<String>, StoreError> {
        let held: Vec<String> = self
            .store
            .list_user_badges(user_id)
            .await?
            .into_iter()
            .map(|b| b.name)
            .collect();

        let due = match streak {
            Some(streak) => check_streak_badges(streak, &held),
            None => check_completion_badges(completions, &held),
        };

        let mut awarded = Vec::new();
        for name in due {
            if self.award_badge(user_id, name).await? == AwardOutcome::Awarded {
                awarded.push(name.to_string());
            }
        }
        Ok(awarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::challenge::{
        ChallengeBody, CreateChallengeRequest, Difficulty, KeyWord,
    };
    use crate::models::journey::CreateJourneyRequest;
    use crate::store::MemoryStore;
    use chrono::Duration;

    /// A store with learners 1 to 3 and one journey of `count` challenges worth `xp`
    /// each; returns the challenge ids.
    async fn store_with_challenges(count: usize, xp: i32) -> (Arc<MemoryStore>, Vec<i64>) {
        let store = Arc::new(MemoryStore::new());
        for n in 1..=3 {
            let user = store
                .create_user(&format!("learner{}", n), "hash", "user")
                .await
                .unwrap();
            assert_eq!(user.id, n);
        }
        let journey = store
            .create_journey(&CreateJourneyRequest {
                title: "Test journey".to_string(),
                description: String::new(),
                difficulty: Difficulty::Beginner,
            })
            .await
            .unwrap();

        let mut ids = Vec::new();
        for i in 0..count {
            let challenge = store
                .create_challenge(&CreateChallengeRequest {
                    journey_id: journey.id,
                    title: format!("Challenge {}", i),
                    description: String::new(),
                    difficulty: Difficulty::Beginner,
                    xp_reward: xp,
                    body: ChallengeBody::WordSelection {
                        passage: "word".to_string(),
                        key_words: vec![KeyWord {
                            word: "word".to_string(),
                            explanation: None,
                        }],
                    },
                })
                .await
                .unwrap();
            ids.push(challenge.id);
        }
        (store, ids)
    }

    #[tokio::test]
    async fn test_record_completion_is_idempotent() {
        let (store, ids) = store_with_challenges(1, 15).await;
        let ledger = AchievementLedger::new(store.clone());

        let first = ledger.record_completion(1, ids[0], 15).await.unwrap();
        assert!(!first.already_completed);
        ledger.update_achievements(1).await.unwrap();

        let second = ledger.record_completion(1, ids[0], 15).await.unwrap();
        assert!(second.success);
        assert!(second.already_completed);

        assert_eq!(store.completion_count().await, 1);
        let totals = ledger.update_achievements(1).await.unwrap();
        assert_eq!(totals.total_challenges_completed, 1);
        assert_eq!(totals.total_xp, 15);
    }

    #[tokio::test]
    async fn test_concurrent_completions_insert_once() {
        let (store, ids) = store_with_challenges(1, 15).await;
        let ledger = AchievementLedger::new(store.clone());

        let (a, b) = tokio::join!(
            ledger.record_completion(1, ids[0], 15),
            ledger.record_completion(1, ids[0], 15)
        );
        let fresh = [a.unwrap(), b.unwrap()]
            .iter()
            .filter(|r| !r.already_completed)
            .count();

        assert_eq!(fresh, 1);
        assert_eq!(store.completion_count().await, 1);
    }

    #[tokio::test]
    async fn test_milestone_badges() {
        let (store, ids) = store_with_challenges(10, 15).await;
        let ledger = AchievementLedger::new(store.clone());

        ledger.record_completion(1, ids[0], 15).await.unwrap();
        let update = ledger.update_achievements(1).await.unwrap();
        assert_eq!(update.badges_awarded, vec!["First Steps"]);

        for id in &ids[1..] {
            ledger.record_completion(1, *id, 15).await.unwrap();
        }
        let update = ledger.update_achievements(1).await.unwrap();
        assert_eq!(update.total_challenges_completed, 10);
        assert_eq!(update.badges_awarded, vec!["Journey Pioneer"]);
        assert_eq!(store.user_badge_count(1).await, 2);
    }

    #[tokio::test]
    async fn test_perfect_score_for_ten_xp() {
        let (store, ids) = store_with_challenges(1, 10).await;
        let ledger = AchievementLedger::new(store);

        ledger.record_completion(1, ids[0], 10).await.unwrap();
        let update = ledger.update_achievements(1).await.unwrap();
        assert!(update.badges_awarded.contains(&"Perfect Score".to_string()));
    }

    #[tokio::test]
    async fn test_award_badge_twice_is_a_no_op() {
        let (store, _) = store_with_challenges(0, 10).await;
        let ledger = AchievementLedger::new(store.clone());

        assert_eq!(ledger.award_badge(1, "Week Warrior").await.unwrap(), AwardOutcome::Awarded);
        assert_eq!(
            ledger.award_badge(1, "Week Warrior").await.unwrap(),
            AwardOutcome::AlreadyEarned
        );
        assert_eq!(store.user_badge_count(1).await, 1);
    }

    #[tokio::test]
    async fn test_award_unknown_badge_is_not_found() {
        let (store, _) = store_with_challenges(0, 10).await;
        let ledger = AchievementLedger::new(store);

        assert!(matches!(
            ledger.award_badge(1, "Time Traveller").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_streak_updates() {
        let (store, _) = store_with_challenges(0, 10).await;
        let ledger = AchievementLedger::new(store.clone());
        let now = Utc::now();

        let start = ledger.check_and_update_streak(1, now - Duration::hours(50)).await.unwrap();
        assert_eq!(start.change, StreakChange::Started);
        assert_eq!(start.streak_count, 1);

        let next_day = ledger
            .check_and_update_streak(1, now - Duration::hours(25))
            .await
            .unwrap();
        assert_eq!(next_day.streak_count, 2);

        let today = ledger.check_and_update_streak(1, now).await.unwrap();
        assert_eq!(today.change, StreakChange::Extended);
        assert_eq!(today.streak_count, 3);

        let later = ledger.check_and_update_streak(1, now + Duration::hours(1)).await.unwrap();
        assert_eq!(later.change, StreakChange::Unchanged);
        assert_eq!(later.streak_count, 3);

        let gap = ledger.check_and_update_streak(1, now + Duration::hours(49)).await.unwrap();
        assert_eq!(gap.change, StreakChange::Reset);
        assert_eq!(gap.streak_count, 0);
    }

    #[tokio::test]
    async fn test_week_streak_awards_badge() {
        let (store, _) = store_with_challenges(0, 10).await;
        let ledger = AchievementLedger::new(store.clone());
        store
            .upsert_achievements(&AchievementRecord {
                user_id: 1,
                streak_count: 6,
                total_challenges_completed: 0,
                total_xp: 0,
                last_activity_date: Some(Utc::now() - Duration::hours(25)),
            })
            .await
            .unwrap();

        let update = ledger.check_and_update_streak(1, Utc::now()).await.unwrap();
        assert_eq!(update.streak_count, 7);
        assert_eq!(update.badges_awarded, vec!["Week Warrior"]);
    }

    #[tokio::test]
    async fn test_on_challenge_completed_swallows_failures() {
        let (store, _) = store_with_challenges(0, 10).await;
        let ledger = AchievementLedger::new(store);

        // Unknown challenge: the insert fails, the caller just gets `None`.
        let event = CompletionEvent {
            challenge_id: 999,
            xp: 10,
        };
        assert!(ledger.on_challenge_completed(1, event, Utc::now()).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_learner_records_nothing() {
        let (store, ids) = store_with_challenges(1, 10).await;
        let ledger = AchievementLedger::new(store.clone());

        assert!(matches!(
            ledger.record_completion(99, ids[0], 10).await,
            Err(StoreError::Unauthorized)
        ));
        let event = CompletionEvent {
            challenge_id: ids[0],
            xp: 10,
        };
        assert!(ledger.on_challenge_completed(99, event, Utc::now()).await.is_none());
        assert_eq!(store.completion_count().await, 0);
    }

    #[tokio::test]
    async fn test_on_challenge_completed_reports_repeat() {
        let (store, ids) = store_with_challenges(1, 20).await;
        let ledger = AchievementLedger::new(store);
        let event = CompletionEvent {
            challenge_id: ids[0],
            xp: 20,
        };

        let first = ledger.on_challenge_completed(3, event, Utc::now()).await.unwrap();
        assert_eq!(first.xp_earned, 20);
        assert_eq!(first.totals.map(|t| t.total_xp), Some(20));

        let again = ledger.on_challenge_completed(3, event, Utc::now()).await.unwrap();
        assert!(again.already_completed);
        assert_eq!(again.xp_earned, 0);
        assert!(again.totals.is_none());
    }
}
