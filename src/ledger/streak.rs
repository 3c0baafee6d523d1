// src/ledger/streak.rs

//! Daily streak arithmetic.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    /// First recorded activity.
    Started,
    /// Exactly one whole day since the last activity.
    Extended,
    /// Same day as the last activity.
    Unchanged,
    /// More than one whole day went by.
    Reset,
}

/// Next streak value given the last activity and now, counted in whole elapsed days.
pub fn next_streak(
    current: i32,
    last_activity: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> (i32, StreakChange) {
    let Some(last) = last_activity else {
        return (1, StreakChange::Started);
    };

    match (now - last).num_days() {
        days if days > 1 => (0, StreakChange::Reset),
        1 => (current + 1, StreakChange::Extended),
        // Same day, or a clock that went backwards.
        _ => (current, StreakChange::Unchanged),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_streak_by_elapsed_hours() {
        let now = Utc::now();

        assert_eq!(
            next_streak(4, Some(now - Duration::hours(25)), now),
            (5, StreakChange::Extended)
        );
        assert_eq!(
            next_streak(4, Some(now - Duration::hours(49)), now),
            (0, StreakChange::Reset)
        );
        assert_eq!(
            next_streak(4, Some(now - Duration::hours(1)), now),
            (4, StreakChange::Unchanged)
        );
    }

    #[test]
    fn test_day_boundaries() {
        let now = Utc::now();

        // 23h59m is still the same day, 47h59m is still one day.
        assert_eq!(
            next_streak(2, Some(now - Duration::minutes(23 * 60 + 59)), now).1,
            StreakChange::Unchanged
        );
        assert_eq!(
            next_streak(2, Some(now - Duration::minutes(47 * 60 + 59)), now).1,
            StreakChange::Extended
        );
    }

    #[test]
    fn test_first_activity_starts_at_one() {
        assert_eq!(next_streak(0, None, Utc::now()), (1, StreakChange::Started));
    }

    #[test]
    fn test_future_timestamp_is_ignored() {
        let now = Utc::now();
        assert_eq!(
            next_streak(3, Some(now + Duration::hours(30)), now),
            (3, StreakChange::Unchanged)
        );
    }
}
