//! Profile progress applied when an instance is approved.
//!
//! Running totals, daily streaks and levels live on the profile row and are
//! updated in the same transaction as the approval, keyed off the approval
//! date. Streaks count approved completions regardless of whether the
//! reward was points or cash.

use chrono::{Duration, NaiveDate};

/// Points needed per level; level 1 starts at zero.
const POINTS_PER_LEVEL: i64 = 100;

/// Progress fields as currently stored on a profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileProgress {
    pub total_points: i64,
    pub streak_days: i32,
    pub last_completion_date: Option<NaiveDate>,
    pub level: i32,
}

/// Progress fields after applying one approved completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionProgress {
    pub total_points: i64,
    pub streak_days: i32,
    pub last_completion_date: NaiveDate,
    pub level: i32,
    pub leveled_up: bool,
}

/// Fold one approved completion into a profile's progress.
///
/// Streak rule: a completion on the day after the last one extends the
/// streak, a second completion on the same day keeps it, anything else
/// restarts at 1.
pub fn apply_completion(
    current: ProfileProgress,
    points: i32,
    completed_on: NaiveDate,
) -> CompletionProgress {
    let total_points = current.total_points + i64::from(points.max(0));

    let streak_days = match current.last_completion_date {
        Some(last) if last == completed_on => current.streak_days,
        Some(last) if last + Duration::days(1) == completed_on => current.streak_days + 1,
        _ => 1,
    };

    let level = level_for_points(total_points);

    CompletionProgress {
        total_points,
        streak_days,
        last_completion_date: completed_on,
        level,
        leveled_up: level > current.level,
    }
}

/// Level reached at a given running total. Linear: one level per 100 points.
pub fn level_for_points(total_points: i64) -> i32 {
    let level = total_points.max(0) / POINTS_PER_LEVEL + 1;
    level.min(i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn profile(total: i64, streak: i32, last: Option<NaiveDate>) -> ProfileProgress {
        ProfileProgress {
            total_points: total,
            streak_days: streak,
            last_completion_date: last,
            level: level_for_points(total),
        }
    }

    #[test]
    fn test_first_completion_starts_a_streak() {
        let progress = apply_completion(profile(0, 0, None), 10, day(10));
        assert_eq!(progress.streak_days, 1);
        assert_eq!(progress.total_points, 10);
        assert_eq!(progress.last_completion_date, day(10));
    }

    #[test]
    fn test_next_day_completion_extends_the_streak() {
        let progress = apply_completion(profile(50, 4, Some(day(10))), 10, day(11));
        assert_eq!(progress.streak_days, 5);
    }

    #[test]
    fn test_same_day_completion_keeps_the_streak() {
        let progress = apply_completion(profile(50, 4, Some(day(10))), 10, day(10));
        assert_eq!(progress.streak_days, 4);
        assert_eq!(progress.total_points, 60);
    }

    #[test]
    fn test_missed_day_restarts_the_streak() {
        let progress = apply_completion(profile(50, 4, Some(day(10))), 10, day(13));
        assert_eq!(progress.streak_days, 1);
    }

    #[test]
    fn test_out_of_order_completion_restarts_the_streak() {
        let progress = apply_completion(profile(50, 4, Some(day(10))), 10, day(9));
        assert_eq!(progress.streak_days, 1);
        assert_eq!(progress.last_completion_date, day(9));
    }

    #[test]
    fn test_zero_point_completion_still_counts_for_the_streak() {
        let progress = apply_completion(profile(50, 2, Some(day(10))), 0, day(11));
        assert_eq!(progress.streak_days, 3);
        assert_eq!(progress.total_points, 50);
    }

    #[test]
    fn test_negative_points_never_reduce_the_total() {
        let progress = apply_completion(profile(50, 1, Some(day(10))), -5, day(11));
        assert_eq!(progress.total_points, 50);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(99), 1);
        assert_eq!(level_for_points(100), 2);
        assert_eq!(level_for_points(250), 3);
    }

    #[test]
    fn test_crossing_a_threshold_flags_a_level_up() {
        let progress = apply_completion(profile(95, 1, Some(day(10))), 10, day(11));
        assert_eq!(progress.level, 2);
        assert!(progress.leveled_up);

        let progress = apply_completion(profile(10, 1, Some(day(10))), 10, day(11));
        assert_eq!(progress.level, 1);
        assert!(!progress.leveled_up);
    }
}
