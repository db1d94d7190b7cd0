//! Reward calculation for chore approvals.
//!
//! Two calculation paths exist: points mode (with an overdue bonus that
//! scales up to a family-configured cap) and cash-out mode (minutes worked
//! converted through the claimant's hourly rate). Both paths produce a
//! [`RewardAudit`] capturing the inputs and the pre-override result, so a
//! parent override never erases how the number was derived.

use chrono::{DateTime, Utc};

use crate::models::RewardAudit;

/// Fallback when a family has no positive grace period configured.
const DEFAULT_GRACE_DAYS: i32 = 3;
/// Fallback when a family has no positive overdue cap configured.
const DEFAULT_OVERDUE_CAP: f64 = 2.0;

const SECONDS_PER_DAY: i64 = 86_400;

/// Input for the points-mode calculation.
#[derive(Debug, Clone)]
pub struct PointsInput {
    pub base_points: i32,
    pub due_at: DateTime<Utc>,
    pub approved_at: DateTime<Utc>,
    pub grace_days: i32,
    pub overdue_cap: f64,
    pub override_points: Option<i32>,
}

/// Result of the points-mode calculation.
#[derive(Debug, Clone)]
pub struct PointsReward {
    pub points: i32,
    pub audit: RewardAudit,
}

/// Input for the cash-out calculation.
#[derive(Debug, Clone)]
pub struct CashOutInput {
    pub base_points: i32,
    pub minutes_reported: i32,
    pub hourly_rate_cents: Option<i64>,
    pub cash_points_percent: i32,
    pub override_cash_cents: Option<i64>,
}

/// Result of the cash-out calculation.
#[derive(Debug, Clone)]
pub struct CashOutReward {
    pub points: i32,
    pub cash_cents: i64,
    pub audit: RewardAudit,
}

/// Calculate the points awarded for an approved instance.
///
/// Late completions still earn a bonus: the multiplier grows linearly with
/// whole days overdue, reaching the cap once `overdue_days / grace_days`
/// exceeds `cap - 1`. Early or on-time approvals get exactly the base
/// points. An explicit override replaces the calculated value but the audit
/// keeps the calculated number.
pub fn points_reward(input: PointsInput) -> PointsReward {
    let grace_days = if input.grace_days > 0 {
        input.grace_days
    } else {
        DEFAULT_GRACE_DAYS
    };
    let cap = if input.overdue_cap > 0.0 {
        input.overdue_cap
    } else {
        DEFAULT_OVERDUE_CAP
    };

    let elapsed = input.approved_at.signed_duration_since(input.due_at);
    let overdue_days = elapsed.num_seconds().div_euclid(SECONDS_PER_DAY).max(0);

    let multiplier = 1.0 + (cap - 1.0).min(overdue_days as f64 / grace_days as f64);
    let calculated_points = (input.base_points as f64 * multiplier).floor() as i32;
    let points = input.override_points.unwrap_or(calculated_points);

    PointsReward {
        points,
        audit: RewardAudit::Points {
            overdue_days,
            multiplier,
            grace_days,
            cap,
            calculated_points,
            override_applied: input.override_points.is_some(),
        },
    }
}

/// Calculate the cash (and optional partial points) for a cash-out approval.
///
/// Without a positive hourly rate on the claimant's profile the whole
/// calculation short-circuits to zero; the approval itself still proceeds.
/// When the family's `cash_points_percent` is positive, a fraction of the
/// base points is awarded alongside the cash.
pub fn cash_out_reward(input: CashOutInput) -> CashOutReward {
    let rate = input.hourly_rate_cents.filter(|rate| *rate > 0);

    let Some(rate) = rate else {
        return CashOutReward {
            points: 0,
            cash_cents: 0,
            audit: RewardAudit::CashOut {
                minutes_reported: input.minutes_reported,
                hourly_rate_cents: 0,
                calculated_cash_cents: 0,
                bonus_points: 0,
                override_applied: false,
            },
        };
    };

    let calculated_cash_cents =
        ((rate as f64 / 60.0) * input.minutes_reported as f64).round() as i64;
    let cash_cents = input.override_cash_cents.unwrap_or(calculated_cash_cents);

    let bonus_points = if input.cash_points_percent > 0 {
        (input.base_points as f64 * (input.cash_points_percent as f64 / 100.0)).floor() as i32
    } else {
        0
    };

    CashOutReward {
        points: bonus_points,
        cash_cents,
        audit: RewardAudit::CashOut {
            minutes_reported: input.minutes_reported,
            hourly_rate_cents: rate,
            calculated_cash_cents,
            bonus_points,
            override_applied: input.override_cash_cents.is_some(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn points_input(overdue_days: i64) -> PointsInput {
        let due_at = Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap();
        PointsInput {
            base_points: 10,
            due_at,
            approved_at: due_at + chrono::Duration::days(overdue_days),
            grace_days: 3,
            overdue_cap: 2.0,
            override_points: None,
        }
    }

    #[test]
    fn test_on_time_approval_awards_base_points() {
        let reward = points_reward(points_input(0));
        assert_eq!(reward.points, 10);
        match reward.audit {
            RewardAudit::Points {
                overdue_days,
                multiplier,
                calculated_points,
                override_applied,
                ..
            } => {
                assert_eq!(overdue_days, 0);
                assert_eq!(multiplier, 1.0);
                assert_eq!(calculated_points, 10);
                assert!(!override_applied);
            }
            other => panic!("expected points audit, got {other:?}"),
        }
    }

    #[test]
    fn test_overdue_bonus_caps_at_double() {
        // 6 days overdue with a 3 day grace period hits the 2.0 cap.
        let reward = points_reward(points_input(6));
        assert_eq!(reward.points, 20);
        match reward.audit {
            RewardAudit::Points {
                overdue_days,
                multiplier,
                cap,
                ..
            } => {
                assert_eq!(overdue_days, 6);
                assert_eq!(multiplier, 2.0);
                assert_eq!(cap, 2.0);
            }
            other => panic!("expected points audit, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_overdue_bonus_floors_points() {
        // 2/3 of the way through grace: multiplier 1.666..., 10 points -> 16.
        let reward = points_reward(points_input(2));
        assert_eq!(reward.points, 16);
    }

    #[test]
    fn test_overdue_beyond_cap_stays_capped() {
        let reward = points_reward(points_input(30));
        assert_eq!(reward.points, 20);
    }

    #[test]
    fn test_early_approval_is_not_negative() {
        let due_at = Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap();
        let reward = points_reward(PointsInput {
            base_points: 10,
            due_at,
            approved_at: due_at - chrono::Duration::days(2),
            grace_days: 3,
            overdue_cap: 2.0,
            override_points: None,
        });
        assert_eq!(reward.points, 10);
        match reward.audit {
            RewardAudit::Points { overdue_days, .. } => assert_eq!(overdue_days, 0),
            other => panic!("expected points audit, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_day_overdue_rounds_down() {
        let due_at = Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap();
        let reward = points_reward(PointsInput {
            base_points: 10,
            due_at,
            approved_at: due_at + chrono::Duration::hours(23),
            grace_days: 3,
            overdue_cap: 2.0,
            override_points: None,
        });
        match reward.audit {
            RewardAudit::Points { overdue_days, .. } => assert_eq!(overdue_days, 0),
            other => panic!("expected points audit, got {other:?}"),
        }
    }

    #[test]
    fn test_override_points_replaces_calculated_value() {
        let mut input = points_input(6);
        input.override_points = Some(5);
        let reward = points_reward(input);
        assert_eq!(reward.points, 5);
        match reward.audit {
            RewardAudit::Points {
                calculated_points,
                override_applied,
                ..
            } => {
                assert_eq!(calculated_points, 20);
                assert!(override_applied);
            }
            other => panic!("expected points audit, got {other:?}"),
        }
    }

    #[test]
    fn test_override_of_zero_points_still_counts_as_override() {
        let mut input = points_input(0);
        input.override_points = Some(0);
        let reward = points_reward(input);
        assert_eq!(reward.points, 0);
        match reward.audit {
            RewardAudit::Points {
                override_applied, ..
            } => assert!(override_applied),
            other => panic!("expected points audit, got {other:?}"),
        }
    }

    #[test]
    fn test_non_positive_settings_fall_back_to_defaults() {
        let mut input = points_input(6);
        input.grace_days = 0;
        input.overdue_cap = 0.0;
        let reward = points_reward(input);
        // Defaults of 3 days grace and 2.0 cap apply.
        assert_eq!(reward.points, 20);
        match reward.audit {
            RewardAudit::Points {
                grace_days, cap, ..
            } => {
                assert_eq!(grace_days, 3);
                assert_eq!(cap, 2.0);
            }
            other => panic!("expected points audit, got {other:?}"),
        }
    }

    #[test]
    fn test_cash_out_converts_minutes_through_hourly_rate() {
        // 1800 cents/hour for 30 minutes is 900 cents.
        let reward = cash_out_reward(CashOutInput {
            base_points: 10,
            minutes_reported: 30,
            hourly_rate_cents: Some(1800),
            cash_points_percent: 0,
            override_cash_cents: None,
        });
        assert_eq!(reward.cash_cents, 900);
        assert_eq!(reward.points, 0);
        match reward.audit {
            RewardAudit::CashOut {
                minutes_reported,
                hourly_rate_cents,
                calculated_cash_cents,
                bonus_points,
                override_applied,
            } => {
                assert_eq!(minutes_reported, 30);
                assert_eq!(hourly_rate_cents, 1800);
                assert_eq!(calculated_cash_cents, 900);
                assert_eq!(bonus_points, 0);
                assert!(!override_applied);
            }
            other => panic!("expected cash audit, got {other:?}"),
        }
    }

    #[test]
    fn test_cash_out_rounds_to_nearest_cent() {
        // 1000 cents/hour for 50 minutes: 833.333... rounds to 833.
        let reward = cash_out_reward(CashOutInput {
            base_points: 10,
            minutes_reported: 50,
            hourly_rate_cents: Some(1000),
            cash_points_percent: 0,
            override_cash_cents: None,
        });
        assert_eq!(reward.cash_cents, 833);

        // 1000 cents/hour for 45 minutes: exactly 750.
        let reward = cash_out_reward(CashOutInput {
            base_points: 10,
            minutes_reported: 45,
            hourly_rate_cents: Some(1000),
            cash_points_percent: 0,
            override_cash_cents: None,
        });
        assert_eq!(reward.cash_cents, 750);
    }

    #[test]
    fn test_cash_out_without_rate_awards_nothing() {
        let reward = cash_out_reward(CashOutInput {
            base_points: 10,
            minutes_reported: 30,
            hourly_rate_cents: None,
            cash_points_percent: 50,
            override_cash_cents: Some(500),
        });
        assert_eq!(reward.cash_cents, 0);
        assert_eq!(reward.points, 0);
        match reward.audit {
            RewardAudit::CashOut {
                hourly_rate_cents,
                calculated_cash_cents,
                override_applied,
                ..
            } => {
                assert_eq!(hourly_rate_cents, 0);
                assert_eq!(calculated_cash_cents, 0);
                assert!(!override_applied);
            }
            other => panic!("expected cash audit, got {other:?}"),
        }
    }

    #[test]
    fn test_cash_out_with_zero_rate_awards_nothing() {
        let reward = cash_out_reward(CashOutInput {
            base_points: 10,
            minutes_reported: 30,
            hourly_rate_cents: Some(0),
            cash_points_percent: 0,
            override_cash_cents: None,
        });
        assert_eq!(reward.cash_cents, 0);
        assert_eq!(reward.points, 0);
    }

    #[test]
    fn test_cash_points_percent_awards_partial_points() {
        // 25% of 10 base points floors to 2.
        let reward = cash_out_reward(CashOutInput {
            base_points: 10,
            minutes_reported: 60,
            hourly_rate_cents: Some(1200),
            cash_points_percent: 25,
            override_cash_cents: None,
        });
        assert_eq!(reward.cash_cents, 1200);
        assert_eq!(reward.points, 2);
    }

    #[test]
    fn test_override_cash_replaces_calculated_value() {
        let reward = cash_out_reward(CashOutInput {
            base_points: 10,
            minutes_reported: 30,
            hourly_rate_cents: Some(1800),
            cash_points_percent: 0,
            override_cash_cents: Some(1500),
        });
        assert_eq!(reward.cash_cents, 1500);
        match reward.audit {
            RewardAudit::CashOut {
                calculated_cash_cents,
                override_applied,
                ..
            } => {
                assert_eq!(calculated_cash_cents, 900);
                assert!(override_applied);
            }
            other => panic!("expected cash audit, got {other:?}"),
        }
    }
}
