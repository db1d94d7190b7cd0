//! Chore instance domain models and approval/claim/submit DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::approval::ApprovalAction;
use crate::models::chore::ChoreType;
use shared::validation::{validate_cash_cents, validate_minutes, validate_points};

/// Lifecycle state of a chore instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Open,
    Claimed,
    Submitted,
    Approved,
    Rejected,
    Expired,
}

impl InstanceStatus {
    /// Whether the approval processor refuses to touch this state again.
    pub fn is_finalized(&self) -> bool {
        matches!(self, InstanceStatus::Approved | InstanceStatus::Rejected)
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceStatus::Open => write!(f, "open"),
            InstanceStatus::Claimed => write!(f, "claimed"),
            InstanceStatus::Submitted => write!(f, "submitted"),
            InstanceStatus::Approved => write!(f, "approved"),
            InstanceStatus::Rejected => write!(f, "rejected"),
            InstanceStatus::Expired => write!(f, "expired"),
        }
    }
}

/// Calculation provenance stored on the instance when it is approved.
///
/// One variant per reward path so the stored document is checked at
/// compile time instead of being an untyped map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RewardAudit {
    Points {
        overdue_days: i64,
        multiplier: f64,
        grace_days: i32,
        cap: f64,
        /// Points the formula produced before any override.
        calculated_points: i32,
        override_applied: bool,
    },
    CashOut {
        minutes_reported: i32,
        hourly_rate_cents: i64,
        /// Cash the formula produced before any override.
        calculated_cash_cents: i64,
        bonus_points: i32,
        override_applied: bool,
    },
}

/// One concrete due occurrence of a chore template.
///
/// Template fields are denormalized onto the instance at spawn time so a
/// later template edit never rewrites history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoreInstance {
    pub id: Uuid,
    pub chore_id: Uuid,
    pub family_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub chore_type: ChoreType,
    pub base_points: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_duration_min: Option<i32>,
    pub due_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Uuid>,
    pub status: InstanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<Uuid>,
    pub cash_out_requested: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_reported: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_awarded: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_cents: Option<i64>,
    pub proof_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<RewardAudit>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for the approval endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalDecisionRequest {
    pub approve: bool,
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
    #[validate(custom(function = "validate_points"))]
    pub override_points: Option<i32>,
    #[validate(custom(function = "validate_cash_cents"))]
    pub override_cash_cents: Option<i64>,
}

/// Response body for the approval endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalDecisionResponse {
    pub success: bool,
    pub action: ApprovalAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_awarded: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_cents: Option<i64>,
}

/// Request body for submitting a claimed instance for approval.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitInstanceRequest {
    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 proof URLs"))]
    pub proof_urls: Vec<String>,
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
    #[serde(default)]
    pub cash_out_requested: bool,
    #[validate(custom(function = "validate_minutes"))]
    pub minutes_reported: Option<i32>,
}

/// Query parameters for listing instances.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListInstancesQuery {
    #[serde(default)]
    pub status: Option<InstanceStatus>,
    /// Restrict to instances claimed by the caller.
    #[serde(default)]
    pub mine: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub cursor: Option<String>,
}

fn default_limit() -> i64 {
    50
}

/// Page of instances with an opaque continuation cursor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInstancesResponse {
    pub data: Vec<ChoreInstance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Submitted instances awaiting a parent decision.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingApprovalsResponse {
    pub data: Vec<ChoreInstance>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(InstanceStatus::Open.to_string(), "open");
        assert_eq!(InstanceStatus::Claimed.to_string(), "claimed");
        assert_eq!(InstanceStatus::Submitted.to_string(), "submitted");
        assert_eq!(InstanceStatus::Approved.to_string(), "approved");
        assert_eq!(InstanceStatus::Rejected.to_string(), "rejected");
        assert_eq!(InstanceStatus::Expired.to_string(), "expired");
    }

    #[test]
    fn test_status_finalized() {
        assert!(InstanceStatus::Approved.is_finalized());
        assert!(InstanceStatus::Rejected.is_finalized());
        assert!(!InstanceStatus::Open.is_finalized());
        assert!(!InstanceStatus::Submitted.is_finalized());
        // Expired work can still be finalized by a late approval
        assert!(!InstanceStatus::Expired.is_finalized());
    }

    #[test]
    fn test_approval_request_deserialize() {
        let json = r#"{"approve":true,"overridePoints":15}"#;
        let req: ApprovalDecisionRequest = serde_json::from_str(json).unwrap();
        assert!(req.approve);
        assert_eq!(req.override_points, Some(15));
        assert!(req.override_cash_cents.is_none());
        assert!(req.reason.is_none());
    }

    #[test]
    fn test_approval_request_validation() {
        let req = ApprovalDecisionRequest {
            approve: true,
            reason: None,
            override_points: Some(-5),
            override_cash_cents: None,
        };
        assert!(req.validate().is_err());

        let req = ApprovalDecisionRequest {
            approve: true,
            reason: None,
            override_points: Some(0),
            override_cash_cents: Some(900),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_submit_request_defaults() {
        let req: SubmitInstanceRequest = serde_json::from_str("{}").unwrap();
        assert!(req.proof_urls.is_empty());
        assert!(!req.cash_out_requested);
        assert!(req.minutes_reported.is_none());
    }

    #[test]
    fn test_submit_request_rejects_zero_minutes() {
        let req = SubmitInstanceRequest {
            proof_urls: vec![],
            notes: None,
            cash_out_requested: true,
            minutes_reported: Some(0),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_points_audit_serialization() {
        let audit = RewardAudit::Points {
            overdue_days: 6,
            multiplier: 2.0,
            grace_days: 3,
            cap: 2.0,
            calculated_points: 20,
            override_applied: false,
        };

        let json = serde_json::to_value(&audit).unwrap();
        assert_eq!(json["mode"], "points");
        assert_eq!(json["overdue_days"], 6);
        assert_eq!(json["multiplier"], 2.0);
        assert_eq!(json["cap"], 2.0);
        assert_eq!(json["calculated_points"], 20);
        assert_eq!(json["override_applied"], false);
    }

    #[test]
    fn test_cash_audit_roundtrip() {
        let audit = RewardAudit::CashOut {
            minutes_reported: 30,
            hourly_rate_cents: 1800,
            calculated_cash_cents: 900,
            bonus_points: 0,
            override_applied: false,
        };

        let json = serde_json::to_string(&audit).unwrap();
        let back: RewardAudit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, audit);
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListInstancesQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 50);
        assert!(query.status.is_none());
        assert!(!query.mine);
        assert!(query.cursor.is_none());
    }
}
