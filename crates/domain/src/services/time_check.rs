//! Heuristic plausibility check for reported chore durations.
//!
//! Compares a reported time against the chore's expected duration and the
//! claimant's own approved history. Purely advisory: the result never blocks
//! a submission, it only feeds the UI and the parent's approval screen.

use crate::models::{TimeCheckResponse, TimeCheckStatus};

/// Reports below half the expected duration are flagged as suspiciously fast.
const MIN_REASONABLE_FACTOR: f64 = 0.5;
/// Reports above 2.5x the expected duration are flagged as suspiciously slow.
const MAX_REASONABLE_FACTOR: f64 = 2.5;

/// Input for a time-estimate assessment.
#[derive(Debug, Clone)]
pub struct TimeCheckInput<'a> {
    /// Expected duration, already resolved from the instance with the chore
    /// definition as fallback. Non-positive values count as unset.
    pub expected_minutes: Option<i32>,
    pub reported_minutes: i32,
    /// Minutes from the claimant's previously approved runs of the same
    /// chore, most recent first.
    pub history_minutes: &'a [i32],
}

/// Assess whether a reported duration looks plausible.
///
/// Band classification against the expected duration comes first, then the
/// claimant's personal history nudges the confidence: within 30% of their
/// median raises it, more than 100% off lowers it.
pub fn assess_reported_time(input: TimeCheckInput<'_>) -> TimeCheckResponse {
    let Some(expected) = input.expected_minutes.filter(|minutes| *minutes > 0) else {
        return TimeCheckResponse {
            status: TimeCheckStatus::Ok,
            message: "No expected duration set for this chore".to_string(),
            suggested_minutes: None,
            confidence: 0.0,
        };
    };

    let reported = input.reported_minutes as f64;
    let min_reasonable = expected as f64 * MIN_REASONABLE_FACTOR;
    let max_reasonable = expected as f64 * MAX_REASONABLE_FACTOR;

    let mut result = if reported < min_reasonable {
        TimeCheckResponse {
            status: TimeCheckStatus::Low,
            message: format!(
                "This seems faster than expected. Expected around {expected} minutes."
            ),
            suggested_minutes: Some((expected as f64 * 0.8).round() as i32),
            confidence: 0.7,
        }
    } else if reported > max_reasonable {
        TimeCheckResponse {
            status: TimeCheckStatus::High,
            message: format!(
                "This seems longer than expected. Expected around {expected} minutes."
            ),
            suggested_minutes: Some((expected as f64 * 1.5).round() as i32),
            confidence: 0.7,
        }
    } else {
        TimeCheckResponse {
            status: TimeCheckStatus::Ok,
            message: "Time reported looks reasonable".to_string(),
            suggested_minutes: None,
            confidence: 0.8,
        }
    };

    if let Some(median) = median_minutes(input.history_minutes) {
        if median > 0.0 {
            let deviation = (reported - median).abs() / median;
            if deviation < 0.3 {
                result.confidence = (result.confidence + 0.2).min(1.0);
                result.message.push_str(" (consistent with your history)");
            } else if deviation > 1.0 {
                result.confidence = (result.confidence - 0.2).max(0.3);
                result.message.push_str(" (differs from your usual time)");
            }
        }
    }

    result
}

/// Median of the given durations, or `None` for an empty slice.
///
/// Even-length inputs take the mean of the two middle values, so the result
/// can be fractional.
pub fn median_minutes(values: &[i32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let middle = sorted.len() / 2;

    Some(if sorted.len() % 2 == 0 {
        f64::from(sorted[middle - 1] + sorted[middle]) / 2.0
    } else {
        f64::from(sorted[middle])
    })
}
