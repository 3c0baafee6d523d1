// src/grading/mod.rs

//! Answer checking, one pure function per challenge kind.
//!
//! Nothing in here touches the store or the session; callers decide what a
//! verdict means (attempt counters, completion records, feedback).

pub mod highlight;
pub mod matching;
pub mod standard;
pub mod word_selection;

use std::collections::BTreeSet;

use thiserror::Error;

use crate::models::{challenge::ChallengeBody, submission::Submission};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GradingError {
    #[error("a {submitted} submission cannot answer a {challenge} challenge")]
    KindMismatch {
        challenge: &'static str,
        submitted: &'static str,
    },
}

fn submission_kind(submission: &Submission) -> &'static str {
    match submission {
        Submission::Option { .. } => "option",
        Submission::Options { .. } => "options",
        Submission::Words { .. } => "words",
        Submission::Pair { .. } => "pair",
        Submission::Spans { .. } => "spans",
    }
}

/// Grades a non-empty submission against a challenge body.
///
/// For matching challenges the verdict covers the single submitted pair, not the round.
pub fn grade(body: &ChallengeBody, submission: &Submission) -> Result<bool, GradingError> {
    let correct = match (body, submission) {
        (ChallengeBody::Standard { options, .. }, Submission::Option { option_id }) => {
            standard::grade(options, &BTreeSet::from([*option_id]))
        }
        (ChallengeBody::Standard { options, .. }, Submission::Options { option_ids }) => {
            standard::grade(options, option_ids)
        }
        (ChallengeBody::WordSelection { key_words, .. }, Submission::Words { words }) => {
            word_selection::grade(key_words, words)
        }
        (
            ChallengeBody::Matching { pairs },
            Submission::Pair {
                claim_id,
                evidence_id,
            },
        ) => matching::is_true_pair(pairs, *claim_id, *evidence_id),
        (
            ChallengeBody::Highlight {
                statement,
                highlights,
            },
            Submission::Spans { spans },
        ) => highlight::grade(statement, highlights, spans),
        _ => {
            return Err(GradingError::KindMismatch {
                challenge: body.kind_name(),
                submitted: submission_kind(submission),
            });
        }
    };

    Ok(correct)
}
