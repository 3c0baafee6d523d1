// src/handlers/session.rs

//! Playing a journey: one in-memory progression session per start.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::Config,
    error::AppError,
    ledger::{AchievementLedger, AchievementUpdate, CompletionSummary, StreakUpdate},
    models::{challenge::RevealedAnswer, submission::SubmitAnswerRequest},
    session::{Phase, ProgressionController, SessionRegistry, SessionSnapshot, SubmitOutcome},
    store::Store,
    utils::jwt::Claims,
};

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub journey_id: i64,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub session: SessionSnapshot,
    pub streak: Option<StreakUpdate>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    #[serde(flatten)]
    pub outcome: SubmitOutcome,
    /// Ledger bookkeeping for a passed challenge. Absent when nothing was recorded.
    pub summary: Option<CompletionSummary>,
    pub journey_badges: Option<AchievementUpdate>,
    pub session: SessionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    pub phase: Phase,
    pub journey_badges: Option<AchievementUpdate>,
    pub session: SessionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct RevealResponse {
    pub answer: RevealedAnswer,
    pub session: SessionSnapshot,
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {} not found", id))
}

/// Starts a journey. The challenge order is shuffled once per session.
pub async fn start_session(
    State(store): State<Arc<dyn Store>>,
    State(sessions): State<SessionRegistry>,
    State(config): State<Config>,
    State(ledger): State<AchievementLedger>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<StartSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    store
        .get_journey(req.journey_id)
        .await?
        .ok_or(AppError::NotFound(format!("Journey {} not found", req.journey_id)))?;
    let challenges = store.list_challenges(req.journey_id).await?;

    let controller = ProgressionController::new(
        req.journey_id,
        challenges,
        config.auto_advance,
        &mut rand::thread_rng(),
    );
    let session = controller.snapshot();
    let session_id = sessions.start(user_id, controller);
    tracing::info!(user_id, journey_id = req.journey_id, %session_id, "Session started");

    let streak = ledger.on_activity(user_id, Utc::now()).await;

    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse {
            session_id,
            session,
            streak,
        }),
    ))
}

pub async fn get_session(
    State(sessions): State<SessionRegistry>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let snapshot = sessions
        .with_session(id, user_id, |c| c.snapshot())
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(snapshot))
}

/// Grades an answer for the current challenge.
///
/// A pass is handed to the ledger after the session lock is released; the
/// verdict stands even if the bookkeeping fails.
pub async fn submit_answer(
    State(sessions): State<SessionRegistry>,
    State(ledger): State<AchievementLedger>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let (outcome, session) = sessions
        .with_session(id, user_id, |c| {
            c.submit(&req.submission).map(|outcome| (outcome, c.snapshot()))
        })
        .ok_or_else(|| session_not_found(id))??;

    let summary = match outcome.completion {
        Some(event) => ledger.on_challenge_completed(user_id, event, Utc::now()).await,
        None => None,
    };

    let journey_badges = if outcome.advanced && outcome.phase == Phase::Completed {
        ledger.on_journey_completed(user_id).await
    } else {
        None
    };

    Ok(Json(SubmitResponse {
        outcome,
        summary,
        journey_badges,
        session,
    }))
}

/// Moves to the next challenge after a pass or a reveal.
pub async fn advance(
    State(sessions): State<SessionRegistry>,
    State(ledger): State<AchievementLedger>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let (phase, session) = sessions
        .with_session(id, user_id, |c| c.advance().map(|phase| (phase, c.snapshot())))
        .ok_or_else(|| session_not_found(id))??;

    let journey_badges = if phase == Phase::Completed {
        tracing::info!(user_id, journey_id = session.journey_id, "Journey completed");
        ledger.on_journey_completed(user_id).await
    } else {
        None
    };

    Ok(Json(AdvanceResponse {
        phase,
        journey_badges,
        session,
    }))
}

/// Shows the solution once enough wrong attempts have been made.
pub async fn reveal_answer(
    State(sessions): State<SessionRegistry>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let (answer, session) = sessions
        .with_session(id, user_id, |c| {
            c.reveal_answer().map(|answer| (answer, c.snapshot()))
        })
        .ok_or_else(|| session_not_found(id))??;

    Ok(Json(RevealResponse { answer, session }))
}
