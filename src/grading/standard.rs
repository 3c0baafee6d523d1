// src/grading/standard.rs

use std::collections::BTreeSet;

use crate::models::challenge::ChallengeOption;

/// Ids of every option marked correct.
pub fn correct_ids(options: &[ChallengeOption]) -> BTreeSet<i64> {
    options
        .iter()
        .filter(|o| o.is_correct)
        .map(|o| o.id)
        .collect()
}

/// Correct iff the selection is exactly the set of correct options.
/// A single-answer challenge is the one-element case; subsets and supersets get no credit.
pub fn grade(options: &[ChallengeOption], selected: &BTreeSet<i64>) -> bool {
    let correct = correct_ids(options);
    !correct.is_empty() && *selected == correct
}
