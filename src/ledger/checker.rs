// src/ledger/checker.rs

//! Badge rules over completion and streak counters.
//!
//! Each check returns the names of badges that are due and not yet held.

use crate::config::{
    COMPLETION_MILESTONES, PERFECT_SCORE_BADGE, PERFECT_SCORE_XP, STREAK_MILESTONES,
};
use crate::models::progress::CompletionRecord;

/// First Steps, Journey Pioneer, Challenge Champion and Perfect Score.
pub fn check_completion_badges(
    completions: &[CompletionRecord],
    held: &[String],
) -> Vec<&'static str> {
    let total = completions.len() as i64;
    let mut due = Vec::new();

    for (threshold, name) in COMPLETION_MILESTONES {
        if total >= threshold && !held.iter().any(|h| h == name) {
            due.push(name);
        }
    }

    // Any completion worth exactly the perfect-score XP counts.
    let perfect = completions.iter().any(|c| c.xp_earned == PERFECT_SCORE_XP);
    if perfect && !held.iter().any(|h| h == PERFECT_SCORE_BADGE) {
        due.push(PERFECT_SCORE_BADGE);
    }

    due
}

/// Week Warrior and Monthly Master.
pub fn check_streak_badges(streak: i32, held: &[String]) -> Vec<&'static str> {
    STREAK_MILESTONES
        .into_iter()
        .filter(|(threshold, name)| streak >= *threshold && !held.iter().any(|h| h == name))
        .map(|(_, name)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn completions(xp: &[i32]) -> Vec<CompletionRecord> {
        xp.iter()
            .enumerate()
            .map(|(i, &xp_earned)| CompletionRecord {
                id: i as i64,
                user_id: 1,
                challenge_id: i as i64 + 100,
                xp_earned,
                completed_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_first_completion_badges() {
        assert_eq!(
            check_completion_badges(&completions(&[10]), &[]),
            vec!["First Steps", "Perfect Score"]
        );
        assert!(check_completion_badges(&completions(&[]), &[]).is_empty());
    }

    #[test]
    fn test_milestones_skip_held_badges() {
        let held = vec!["First Steps".to_string()];
        let due = check_completion_badges(&completions(&[15; 10]), &held);
        assert_eq!(due, vec!["Journey Pioneer"]);
    }

    #[test]
    fn test_fifty_completions() {
        let due = check_completion_badges(&completions(&[20; 50]), &[]);
        assert_eq!(due, vec!["First Steps", "Journey Pioneer", "Challenge Champion"]);
    }

    #[test]
    fn test_streak_badges() {
        assert!(check_streak_badges(6, &[]).is_empty());
        assert_eq!(check_streak_badges(7, &[]), vec!["Week Warrior"]);
        assert_eq!(
            check_streak_badges(30, &["Week Warrior".to_string()]),
            vec!["Monthly Master"]
        );
    }
}
