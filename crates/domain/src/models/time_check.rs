//! Time-estimate check wire models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::validation::validate_minutes;

/// Verdict of a time-estimate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeCheckStatus {
    Ok,
    Low,
    High,
}

impl std::fmt::Display for TimeCheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeCheckStatus::Ok => write!(f, "ok"),
            TimeCheckStatus::Low => write!(f, "low"),
            TimeCheckStatus::High => write!(f, "high"),
        }
    }
}

/// Request body asking whether a reported time looks plausible.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TimeCheckRequest {
    #[validate(custom(function = "validate_minutes"))]
    pub reported_minutes: i32,
}

/// Plausibility assessment sent back to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeCheckResponse {
    pub status: TimeCheckStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_minutes: Option<i32>,
    pub confidence: f64,
}
