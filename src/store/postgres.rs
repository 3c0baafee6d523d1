// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, types::Json};

use super::{Store, StoreError};
use crate::models::{
    badge::{Badge, EarnedBadge},
    challenge::{Challenge, ChallengeBody, CreateChallengeRequest, Difficulty},
    feedback::Feedback,
    journey::{CreateJourneyRequest, Journey},
    progress::{AchievementRecord, CompletionRecord},
    user::{FontSize, Preferences, User},
};

/// Postgres-backed store. Queries are checked at runtime, not by `query!` macros.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_difficulty(s: &str) -> Result<Difficulty, StoreError> {
    Difficulty::parse(s).ok_or_else(|| StoreError::Backend(format!("unknown difficulty '{}'", s)))
}

/// Helper struct for reading the 'journeys' table.
#[derive(FromRow)]
struct JourneyRow {
    id: i64,
    title: String,
    description: String,
    difficulty: String,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl TryFrom<JourneyRow> for Journey {
    type Error = StoreError;

    fn try_from(row: JourneyRow) -> Result<Self, Self::Error> {
        Ok(Journey {
            id: row.id,
            title: row.title,
            description: row.description,
            difficulty: parse_difficulty(&row.difficulty)?,
            created_at: row.created_at,
        })
    }
}

/// Helper struct for reading the 'challenges' table; `body` is the JSONB tagged union.
#[derive(FromRow)]
struct ChallengeRow {
    id: i64,
    journey_id: i64,
    title: String,
    description: String,
    difficulty: String,
    xp_reward: i32,
    body: Json<ChallengeBody>,
}

impl TryFrom<ChallengeRow> for Challenge {
    type Error = StoreError;

    fn try_from(row: ChallengeRow) -> Result<Self, Self::Error> {
        Ok(Challenge {
            id: row.id,
            journey_id: row.journey_id,
            title: row.title,
            description: row.description,
            difficulty: parse_difficulty(&row.difficulty)?,
            xp_reward: row.xp_reward,
            body: row.body.0,
        })
    }
}

#[derive(FromRow)]
struct PreferencesRow {
    font_size: String,
    high_contrast: bool,
    preferred_difficulty: Option<String>,
}

const CHALLENGE_COLUMNS: &str = "id, journey_id, title, description, difficulty, xp_reward, body";

#[async_trait]
impl Store for PgStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password, role, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, role, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_preferences(&self, user_id: i64) -> Result<Preferences, StoreError> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            r#"
            SELECT font_size, high_contrast, preferred_difficulty
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(Preferences::default());
        };

        Ok(Preferences {
            font_size: FontSize::parse(&row.font_size).unwrap_or_default(),
            high_contrast: row.high_contrast,
            preferred_difficulty: row
                .preferred_difficulty
                .as_deref()
                .and_then(Difficulty::parse),
        })
    }

    async fn save_preferences(
        &self,
        user_id: i64,
        prefs: &Preferences,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, font_size, high_contrast, preferred_difficulty)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                font_size = EXCLUDED.font_size,
                high_contrast = EXCLUDED.high_contrast,
                preferred_difficulty = EXCLUDED.preferred_difficulty
            "#,
        )
        .bind(user_id)
        .bind(prefs.font_size.as_str())
        .bind(prefs.high_contrast)
        .bind(prefs.preferred_difficulty.map(|d| d.as_str()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_journeys(&self) -> Result<Vec<Journey>, StoreError> {
        let rows = sqlx::query_as::<_, JourneyRow>(
            "SELECT id, title, description, difficulty, created_at FROM journeys ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Journey::try_from).collect()
    }

    async fn get_journey(&self, id: i64) -> Result<Option<Journey>, StoreError> {
        let row = sqlx::query_as::<_, JourneyRow>(
            "SELECT id, title, description, difficulty, created_at FROM journeys WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Journey::try_from).transpose()
    }

    async fn create_journey(&self, req: &CreateJourneyRequest) -> Result<Journey, StoreError> {
        let row = sqlx::query_as::<_, JourneyRow>(
            r#"
            INSERT INTO journeys (title, description, difficulty)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, difficulty, created_at
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.difficulty.as_str())
        .fetch_one(&self.pool)
        .await?;

        Journey::try_from(row)
    }

    async fn list_challenges(&self, journey_id: i64) -> Result<Vec<Challenge>, StoreError> {
        let rows = sqlx::query_as::<_, ChallengeRow>(&format!(
            "SELECT {} FROM challenges WHERE journey_id = $1 ORDER BY id",
            CHALLENGE_COLUMNS
        ))
        .bind(journey_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Challenge::try_from).collect()
    }

    async fn create_challenge(
        &self,
        req: &CreateChallengeRequest,
    ) -> Result<Challenge, StoreError> {
        let row = sqlx::query_as::<_, ChallengeRow>(&format!(
            r#"
            INSERT INTO challenges (journey_id, title, description, difficulty, xp_reward, body)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            CHALLENGE_COLUMNS
        ))
        .bind(req.journey_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.difficulty.as_str())
        .bind(req.xp_reward)
        .bind(Json(&req.body))
        .fetch_one(&self.pool)
        .await?;

        Challenge::try_from(row)
    }

    async fn delete_challenge(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM challenges WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn find_completion(
        &self,
        user_id: i64,
        challenge_id: i64,
    ) -> Result<Option<CompletionRecord>, StoreError> {
        let record = sqlx::query_as::<_, CompletionRecord>(
            r#"
            SELECT id, user_id, challenge_id, xp_earned, completed_at
            FROM user_progress
            WHERE user_id = $1 AND challenge_id = $2
            "#,
        )
        .bind(user_id)
        .bind(challenge_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert_completion(
        &self,
        user_id: i64,
        challenge_id: i64,
        xp_earned: i32,
    ) -> Result<CompletionRecord, StoreError> {
        let record = sqlx::query_as::<_, CompletionRecord>(
            r#"
            INSERT INTO user_progress (user_id, challenge_id, xp_earned)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, challenge_id, xp_earned, completed_at
            "#,
        )
        .bind(user_id)
        .bind(challenge_id)
        .bind(xp_earned)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_completions(&self, user_id: i64) -> Result<Vec<CompletionRecord>, StoreError> {
        let records = sqlx::query_as::<_, CompletionRecord>(
            r#"
            SELECT id, user_id, challenge_id, xp_earned, completed_at
            FROM user_progress
            WHERE user_id = $1
            ORDER BY completed_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn get_achievements(
        &self,
        user_id: i64,
    ) -> Result<Option<AchievementRecord>, StoreError> {
        let record = sqlx::query_as::<_, AchievementRecord>(
            r#"
            SELECT user_id, streak_count, total_challenges_completed, total_xp, last_activity_date
            FROM user_achievements
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn upsert_achievements(&self, record: &AchievementRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_achievements
                (user_id, streak_count, total_challenges_completed, total_xp, last_activity_date)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                streak_count = EXCLUDED.streak_count,
                total_challenges_completed = EXCLUDED.total_challenges_completed,
                total_xp = EXCLUDED.total_xp,
                last_activity_date = EXCLUDED.last_activity_date
            "#,
        )
        .bind(record.user_id)
        .bind(record.streak_count)
        .bind(record.total_challenges_completed)
        .bind(record.total_xp)
        .bind(record.last_activity_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_badges(&self) -> Result<Vec<Badge>, StoreError> {
        let badges = sqlx::query_as::<_, Badge>(
            "SELECT id, name, description, icon_name FROM badges ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(badges)
    }

    async fn find_badge_by_name(&self, name: &str) -> Result<Option<Badge>, StoreError> {
        let badge = sqlx::query_as::<_, Badge>(
            "SELECT id, name, description, icon_name FROM badges WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(badge)
    }

    async fn insert_user_badge(&self, user_id: i64, badge_id: i64) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO user_badges (user_id, badge_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(badge_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<EarnedBadge>, StoreError> {
        let badges = sqlx::query_as::<_, EarnedBadge>(
            r#"
            SELECT b.id, b.name, b.description, b.icon_name, ub.earned_at
            FROM user_badges ub
            JOIN badges b ON ub.badge_id = b.id
            WHERE ub.user_id = $1
            ORDER BY ub.earned_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(badges)
    }

    async fn insert_feedback(
        &self,
        user_id: i64,
        challenge_id: Option<i64>,
        message: &str,
    ) -> Result<Feedback, StoreError> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (user_id, challenge_id, message)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, challenge_id, message, created_at
            "#,
        )
        .bind(user_id)
        .bind(challenge_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        Ok(feedback)
    }
}
