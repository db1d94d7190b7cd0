//! Recurrence rule parsing and expansion.
//!
//! Supports the subset of RFC 5545 RRULE syntax the mobile clients emit:
//! `FREQ=DAILY|WEEKLY|MONTHLY` with optional `INTERVAL`, `BYDAY`,
//! `BYMONTHDAY`, `BYHOUR` and `BYMINUTE` components. Rules carry no DTSTART,
//! so interval phase is anchored to a fixed epoch (2000-01-01) and
//! occurrence times are taken from BYHOUR/BYMINUTE (midnight UTC when
//! absent). Expansion is therefore a pure function of the rule and the
//! window: re-running it over overlapping windows yields identical
//! timestamps, which the spawner's duplicate suppression depends on.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc, Weekday};
use thiserror::Error;

/// Interval phase anchor for rules without a DTSTART.
const EPOCH: (i32, u32, u32) = (2000, 1, 1);

/// Upper bound on the number of days a single expansion will walk.
const MAX_EXPANSION_DAYS: i64 = 366;

/// Errors from parsing a recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    #[error("recurrence rule is empty")]
    Empty,
    #[error("recurrence rule has no FREQ component")]
    MissingFrequency,
    #[error("unsupported frequency: {0}")]
    UnsupportedFrequency(String),
    #[error("unsupported component in recurrence rule: {0}")]
    UnsupportedComponent(String),
    #[error("invalid value for {component}: {value}")]
    InvalidValue { component: String, value: String },
}

/// Base repetition frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub freq: Frequency,
    pub interval: u32,
    /// Weekdays for WEEKLY rules; empty means Monday.
    pub by_day: Vec<Weekday>,
    /// Days of month for MONTHLY rules; negative counts from the end,
    /// empty means the 1st.
    pub by_month_day: Vec<i32>,
    pub by_hour: Option<u32>,
    pub by_minute: Option<u32>,
}

impl FromStr for RecurrenceRule {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RecurrenceError::Empty);
        }

        let mut freq = None;
        let mut interval = 1u32;
        let mut by_day = Vec::new();
        let mut by_month_day = Vec::new();
        let mut by_hour = None;
        let mut by_minute = None;

        for part in s.split(';') {
            let Some((key, value)) = part.split_once('=') else {
                return Err(RecurrenceError::UnsupportedComponent(part.to_string()));
            };

            match key {
                "FREQ" => {
                    freq = Some(match value {
                        "DAILY" => Frequency::Daily,
                        "WEEKLY" => Frequency::Weekly,
                        "MONTHLY" => Frequency::Monthly,
                        other => {
                            return Err(RecurrenceError::UnsupportedFrequency(other.to_string()))
                        }
                    });
                }
                "INTERVAL" => {
                    interval = value
                        .parse::<u32>()
                        .ok()
                        .filter(|parsed| *parsed >= 1)
                        .ok_or_else(|| invalid(key, value))?;
                }
                "BYDAY" => {
                    for day in value.split(',') {
                        by_day.push(parse_weekday(day).ok_or_else(|| invalid(key, day))?);
                    }
                }
                "BYMONTHDAY" => {
                    for day in value.split(',') {
                        let parsed = day
                            .parse::<i32>()
                            .ok()
                            .filter(|parsed| (1..=31).contains(&parsed.abs()))
                            .ok_or_else(|| invalid(key, day))?;
                        by_month_day.push(parsed);
                    }
                }
                "BYHOUR" => {
                    by_hour = Some(
                        value
                            .parse::<u32>()
                            .ok()
                            .filter(|parsed| *parsed <= 23)
                            .ok_or_else(|| invalid(key, value))?,
                    );
                }
                "BYMINUTE" => {
                    by_minute = Some(
                        value
                            .parse::<u32>()
                            .ok()
                            .filter(|parsed| *parsed <= 59)
                            .ok_or_else(|| invalid(key, value))?,
                    );
                }
                other => return Err(RecurrenceError::UnsupportedComponent(other.to_string())),
            }
        }

        Ok(RecurrenceRule {
            freq: freq.ok_or(RecurrenceError::MissingFrequency)?,
            interval,
            by_day,
            by_month_day,
            by_hour,
            by_minute,
        })
    }
}

impl RecurrenceRule {
    /// Concrete occurrence timestamps within `[start, end]`, both inclusive.
    ///
    /// Occurrences land at BYHOUR:BYMINUTE UTC on each matching day; a
    /// matching day whose occurrence time falls before `start` is excluded.
    pub fn occurrences_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<DateTime<Utc>> {
        if end < start {
            return Vec::new();
        }

        let first_day = start.date_naive();
        let mut days = (end.date_naive() - first_day).num_days() + 1;
        if days > MAX_EXPANSION_DAYS {
            tracing::warn!(window_days = days, "recurrence window truncated");
            days = MAX_EXPANSION_DAYS;
        }

        let time = NaiveTime::from_hms_opt(
            self.by_hour.unwrap_or(0),
            self.by_minute.unwrap_or(0),
            0,
        )
        .unwrap_or(NaiveTime::MIN);

        let mut occurrences = Vec::new();
        for offset in 0..days {
            let date = first_day + Duration::days(offset);
            if !self.matches_date(date) {
                continue;
            }
            let occurrence = date.and_time(time).and_utc();
            if occurrence >= start && occurrence <= end {
                occurrences.push(occurrence);
            }
        }
        occurrences
    }

    fn matches_date(&self, date: NaiveDate) -> bool {
        let (year, month, day) = EPOCH;
        let epoch = NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date);
        let interval = i64::from(self.interval.max(1));

        match self.freq {
            Frequency::Daily => {
                let day_index = (date - epoch).num_days();
                day_index.rem_euclid(interval) == 0
            }
            Frequency::Weekly => {
                let epoch_monday =
                    epoch - Duration::days(epoch.weekday().num_days_from_monday() as i64);
                let week_index = (date - epoch_monday).num_days().div_euclid(7);
                if week_index.rem_euclid(interval) != 0 {
                    return false;
                }
                if self.by_day.is_empty() {
                    date.weekday() == Weekday::Mon
                } else {
                    self.by_day.contains(&date.weekday())
                }
            }
            Frequency::Monthly => {
                let month_index = i64::from(date.year() - epoch.year()) * 12
                    + i64::from(date.month()) - i64::from(epoch.month());
                if month_index.rem_euclid(interval) != 0 {
                    return false;
                }
                if self.by_month_day.is_empty() {
                    date.day() == 1
                } else {
                    self.by_month_day
                        .iter()
                        .any(|wanted| resolves_to_day(date, *wanted))
                }
            }
        }
    }
}

/// Parse a rule and expand it in one step.
pub fn expand_rrule(
    rule: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DateTime<Utc>>, RecurrenceError> {
    Ok(rule.parse::<RecurrenceRule>()?.occurrences_between(start, end))
}

fn invalid(component: &str, value: &str) -> RecurrenceError {
    RecurrenceError::InvalidValue {
        component: component.to_string(),
        value: value.to_string(),
    }
}

fn parse_weekday(token: &str) -> Option<Weekday> {
    match token {
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        "SU" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Whether `date` is the `wanted` day of its month, counting negative
/// values from the month's end (-1 is the last day).
fn resolves_to_day(date: NaiveDate, wanted: i32) -> bool {
    if wanted > 0 {
        return date.day() as i32 == wanted;
    }

    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
    let Some(next_month) = first.checked_add_months(Months::new(1)) else {
        return false;
    };
    let last_day = (next_month - Duration::days(1)).day() as i32;
    date.day() as i32 == last_day + 1 + wanted
}
