//! Reporting windows for leaderboard aggregation.
//!
//! All windows are computed in UTC. Weeks run Monday through Sunday, months
//! follow the calendar, and the all-time window starts at a fixed date well
//! before any recorded data.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};

use crate::models::Period;

/// A closed aggregation window.
///
/// `starts_at`/`ends_at` bound the `approved_at` range (both inclusive);
/// `starts_on`/`ends_on` are the dates stored on the snapshot rows, with
/// `starts_on` part of the upsert key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

/// Resolve the aggregation window for a period as of `now`.
pub fn period_window(period: Period, now: DateTime<Utc>) -> PeriodWindow {
    let today = now.date_naive();

    match period {
        Period::Week => {
            let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            closed_window(monday, monday + Duration::days(6))
        }
        Period::Month => {
            let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
            let last = first
                .checked_add_months(Months::new(1))
                .map(|next| next - Duration::days(1))
                .unwrap_or(today);
            closed_window(first, last)
        }
        Period::AllTime => {
            let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
            PeriodWindow {
                starts_at: start.and_time(NaiveTime::MIN).and_utc(),
                ends_at: now,
                starts_on: start,
                ends_on: today,
            }
        }
    }
}

/// Window spanning whole days, ending at 23:59:59.999 on the last day.
fn closed_window(starts_on: NaiveDate, ends_on: NaiveDate) -> PeriodWindow {
    let starts_at = starts_on.and_time(NaiveTime::MIN).and_utc();
    let ends_at =
        (ends_on + Duration::days(1)).and_time(NaiveTime::MIN).and_utc() - Duration::milliseconds(1);

    PeriodWindow {
        starts_at,
        ends_at,
        starts_on,
        ends_on,
    }
}
