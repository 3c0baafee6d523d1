// src/models/submission.rs

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A span of the statement delimited by the learner's selection gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSpan {
    pub text: String,

    /// Character offset of the selection within the statement, when the client knows it.
    #[serde(default)]
    pub start: Option<usize>,
}

/// What a learner hands in for the current challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Submission {
    /// One option of a standard challenge.
    Option { option_id: i64 },
    /// Several options of a multi-select standard challenge.
    Options { option_ids: BTreeSet<i64> },
    /// Words clicked in a word-selection passage.
    Words { words: BTreeSet<String> },
    /// A single claim/evidence association of a matching round.
    Pair { claim_id: i64, evidence_id: i64 },
    /// Selections made over a highlight statement.
    Spans { spans: Vec<SelectedSpan> },
}

impl Submission {
    /// True when nothing was selected; such submissions never reach grading.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Option { .. } | Self::Pair { .. } => false,
            Self::Options { option_ids } => option_ids.is_empty(),
            Self::Words { words } => words.iter().all(|w| w.is_empty()),
            Self::Spans { spans } => spans.iter().all(|s| s.text.trim().is_empty()),
        }
    }
}

/// DTO wrapper for `POST /api/sessions/{id}/submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub submission: Submission,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_parses_tagged_json() {
        let sub: Submission = serde_json::from_value(serde_json::json!({
            "type": "pair",
            "claim_id": 3,
            "evidence_id": 4
        }))
        .unwrap();
        assert_eq!(
            sub,
            Submission::Pair {
                claim_id: 3,
                evidence_id: 4
            }
        );
    }

    #[test]
    fn test_blank_spans_are_empty() {
        let sub = Submission::Spans {
            spans: vec![SelectedSpan {
                text: "   ".to_string(),
                start: Some(2),
            }],
        };
        assert!(sub.is_empty());
        assert!(
            Submission::Options {
                option_ids: BTreeSet::new()
            }
            .is_empty()
        );
        assert!(!Submission::Option { option_id: 1 }.is_empty());
    }
}
