// src/session/controller.rs

//! Per-learner, per-journey progression through a shuffled challenge list.
//!
//! State lives in memory for the lifetime of a session only. Persisting a
//! completion is the caller's job; the controller just reports it.

use std::collections::BTreeSet;

use rand::{Rng, seq::SliceRandom};
use serde::Serialize;
use thiserror::Error;

use crate::{
    config::REVEAL_AFTER_WRONG_ATTEMPTS,
    grading::{self, GradingError, matching},
    models::{
        challenge::{Challenge, ChallengeBody, PublicChallenge, RevealedAnswer},
        submission::Submission,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for an answer to the current challenge.
    Answering,
    /// The current challenge was answered correctly; waiting for `advance`.
    Correct,
    /// Every challenge has been passed.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    /// One matching pair locked, others still open.
    PairMatched,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("Please select an answer before submitting")]
    EmptySubmission,

    #[error("This journey is already completed")]
    Completed,

    #[error("Answer the current challenge before moving on")]
    NotAnswered,

    #[error("The answer can be revealed after {0} wrong attempts")]
    RevealLocked(u32),

    #[error("That claim or evidence has already been matched")]
    AlreadyMatched,

    #[error(transparent)]
    Grading(#[from] GradingError),
}

/// Emitted when a challenge is passed; consumed by the achievement ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionEvent {
    pub challenge_id: i64,
    pub xp: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub verdict: Verdict,
    pub wrong_attempts: u32,
    pub can_reveal: bool,
    /// Pairs still open in a matching round.
    pub remaining_pairs: Option<usize>,
    pub completion: Option<CompletionEvent>,
    /// Set when the session moved on by itself after a correct answer.
    pub advanced: bool,
    pub phase: Phase,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub journey_id: i64,
    pub phase: Phase,
    pub current_index: usize,
    pub total: usize,
    pub current: Option<PublicChallenge>,
    pub wrong_attempts: u32,
    pub can_reveal: bool,
    pub answer_revealed: bool,
    pub matched_pair_ids: Vec<i64>,
    pub completed_ids: Vec<i64>,
}

#[derive(Debug)]
pub struct ProgressionController {
    journey_id: i64,
    challenges: Vec<Challenge>,
    current_index: usize,
    wrong_attempts: u32,
    answer_revealed: bool,
    completed_ids: Vec<i64>,
    matched_pairs: BTreeSet<i64>,
    phase: Phase,
    auto_advance: bool,
}

impl ProgressionController {
    /// Starts a session on `challenges`, shuffled once with `rng` (Fisher-Yates).
    pub fn new<R: Rng + ?Sized>(
        journey_id: i64,
        mut challenges: Vec<Challenge>,
        auto_advance: bool,
        rng: &mut R,
    ) -> Self {
        challenges.shuffle(rng);
        let phase = if challenges.is_empty() {
            Phase::Completed
        } else {
            Phase::Answering
        };

        Self {
            journey_id,
            challenges,
            current_index: 0,
            wrong_attempts: 0,
            answer_revealed: false,
            completed_ids: Vec::new(),
            matched_pairs: BTreeSet::new(),
            phase,
            auto_advance,
        }
    }

    pub fn journey_id(&self) -> i64 {
        self.journey_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current(&self) -> Option<&Challenge> {
        match self.phase {
            Phase::Completed => None,
            _ => self.challenges.get(self.current_index),
        }
    }

    pub fn wrong_attempts(&self) -> u32 {
        self.wrong_attempts
    }

    pub fn can_reveal(&self) -> bool {
        self.phase != Phase::Completed && self.wrong_attempts >= REVEAL_AFTER_WRONG_ATTEMPTS
    }

    pub fn completed_ids(&self) -> &[i64] {
        &self.completed_ids
    }

    /// Grades `submission` against the current challenge.
    ///
    /// A repeat submission after a correct answer reports the same completion again;
    /// the ledger's uniqueness check keeps it from counting twice.
    pub fn submit(&mut self, submission: &Submission) -> Result<SubmitOutcome, ProgressionError> {
        if self.phase == Phase::Completed {
            return Err(ProgressionError::Completed);
        }

        let challenge = &self.challenges[self.current_index];
        let event = CompletionEvent {
            challenge_id: challenge.id,
            xp: challenge.xp_reward,
        };

        if self.phase == Phase::Correct {
            return Ok(self.outcome(Verdict::Correct, None, Some(event), false));
        }
        if submission.is_empty() {
            return Err(ProgressionError::EmptySubmission);
        }

        let correct = grading::grade(&challenge.body, submission)?;

        let mut round_open = None;
        if let (
            ChallengeBody::Matching { pairs },
            Submission::Pair {
                claim_id,
                evidence_id,
            },
        ) = (&challenge.body, submission)
        {
            // Locked claims and locked evidence both leave the pool.
            if self.matched_pairs.contains(claim_id) || self.matched_pairs.contains(evidence_id) {
                return Err(ProgressionError::AlreadyMatched);
            }
            if correct {
                self.matched_pairs.insert(*claim_id);
                if !matching::all_matched(pairs, &self.matched_pairs) {
                    round_open = Some(
                        pairs
                            .iter()
                            .filter(|p| !self.matched_pairs.contains(&p.id))
                            .count(),
                    );
                }
            }
        }

        match (correct, round_open) {
            (true, Some(left)) => Ok(self.outcome(Verdict::PairMatched, Some(left), None, false)),
            (true, None) => Ok(self.mark_correct(event)),
            (false, _) => {
                self.wrong_attempts += 1;
                tracing::debug!(
                    challenge_id = event.challenge_id,
                    wrong_attempts = self.wrong_attempts,
                    "Incorrect answer"
                );
                Ok(self.outcome(Verdict::Incorrect, None, None, false))
            }
        }
    }

    /// Exposes the solution once enough wrong attempts were made. The session goes on.
    pub fn reveal_answer(&mut self) -> Result<RevealedAnswer, ProgressionError> {
        if self.phase == Phase::Completed {
            return Err(ProgressionError::Completed);
        }
        if !self.answer_revealed && !self.can_reveal() {
            return Err(ProgressionError::RevealLocked(REVEAL_AFTER_WRONG_ATTEMPTS));
        }

        self.answer_revealed = true;
        Ok(self.challenges[self.current_index].body.to_revealed())
    }

    /// Moves to the next challenge after a correct answer or a reveal.
    pub fn advance(&mut self) -> Result<Phase, ProgressionError> {
        match self.phase {
            Phase::Completed => Err(ProgressionError::Completed),
            Phase::Answering if !self.answer_revealed => Err(ProgressionError::NotAnswered),
            _ => {
                self.step();
                Ok(self.phase)
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            journey_id: self.journey_id,
            phase: self.phase,
            current_index: self.current_index.min(self.challenges.len()),
            total: self.challenges.len(),
            current: self.current().map(Challenge::to_public),
            wrong_attempts: self.wrong_attempts,
            can_reveal: self.can_reveal(),
            answer_revealed: self.answer_revealed,
            matched_pair_ids: self.matched_pairs.iter().copied().collect(),
            completed_ids: self.completed_ids.clone(),
        }
    }

    fn mark_correct(&mut self, event: CompletionEvent) -> SubmitOutcome {
        self.wrong_attempts = 0;
        self.phase = Phase::Correct;
        if !self.completed_ids.contains(&event.challenge_id) {
            self.completed_ids.push(event.challenge_id);
        }

        let advanced = self.auto_advance;
        if advanced {
            self.step();
        }
        self.outcome(Verdict::Correct, None, Some(event), advanced)
    }

    fn step(&mut self) {
        self.current_index += 1;
        self.wrong_attempts = 0;
        self.answer_revealed = false;
        self.matched_pairs.clear();
        self.phase = if self.current_index >= self.challenges.len() {
            Phase::Completed
        } else {
            Phase::Answering
        };
    }

    fn outcome(
        &self,
        verdict: Verdict,
        remaining_pairs: Option<usize>,
        completion: Option<CompletionEvent>,
        advanced: bool,
    ) -> SubmitOutcome {
        SubmitOutcome {
            verdict,
            wrong_attempts: self.wrong_attempts,
            can_reveal: self.can_reveal(),
            remaining_pairs,
            completion,
            advanced,
            phase: self.phase,
        }
    }
}
