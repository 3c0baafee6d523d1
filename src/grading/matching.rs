// src/grading/matching.rs

use std::collections::BTreeSet;

use crate::models::challenge::MatchPair;

/// A claim and a piece of evidence belong together when both come from the same pair.
pub fn is_true_pair(pairs: &[MatchPair], claim_id: i64, evidence_id: i64) -> bool {
    claim_id == evidence_id && pairs.iter().any(|p| p.id == claim_id)
}

/// The round is won once every pair has been locked, whatever the order.
pub fn all_matched(pairs: &[MatchPair], locked: &BTreeSet<i64>) -> bool {
    pairs.iter().all(|p| locked.contains(&p.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<MatchPair> {
        vec![
            MatchPair {
                id: 10,
                claim: "Coffee cures colds".to_string(),
                evidence: "Anecdote from a blog".to_string(),
            },
            MatchPair {
                id: 11,
                claim: "Smoking harms lungs".to_string(),
                evidence: "Decades of cohort studies".to_string(),
            },
        ]
    }

    #[test]
    fn test_true_pair_requires_same_pair() {
        let pairs = pairs();
        assert!(is_true_pair(&pairs, 10, 10));
        assert!(!is_true_pair(&pairs, 10, 11));
        assert!(!is_true_pair(&pairs, 12, 12));
    }

    #[test]
    fn test_all_matched_in_any_order() {
        let pairs = pairs();
        assert!(!all_matched(&pairs, &BTreeSet::from([11])));
        assert!(all_matched(&pairs, &BTreeSet::from([11, 10])));
    }
}
