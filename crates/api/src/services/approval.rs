//! Approval decision service.
//!
//! Orchestrates the decision workflow:
//! 1. Load and gate the submitted instance
//! 2. Run the reward calculation (points or cash-out)
//! 3. Finalize atomically with the approval record and notification

use chrono::Utc;
use domain::models::chore_instance::{ApprovalDecisionRequest, ApprovalDecisionResponse};
use domain::models::{ApprovalAction, InstanceStatus, Role};
use domain::services::rewards::{cash_out_reward, points_reward, CashOutInput, PointsInput};
use persistence::entities::{NewNotification, NotificationKindDb};
use persistence::repositories::{
    ApprovalFinalization, ChoreInstanceRepository, FamilyRepository, ProfileRepository,
    RejectionFinalization,
};
use serde_json::json;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::middleware::metrics::record_approval_decision;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while deciding a submitted instance.
#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Instance not found")]
    NotFound,

    #[error("Instance belongs to another family")]
    ForeignFamily,

    #[error("Only parents can decide submitted chores")]
    NotParent,

    #[error("Instance is not awaiting review (status: {0})")]
    NotSubmitted(String),

    #[error("Instance was already decided")]
    AlreadyDecided,

    #[error("Submitted instance has no claimant")]
    MissingClaimant,

    #[error("Family record missing for instance")]
    FamilyMissing,

    #[error("Failed to encode reward audit: {0}")]
    AuditEncoding(#[from] serde_json::Error),
}

// ============================================================================
// Approval Service
// ============================================================================

/// Service that turns a parent's decision into the final instance state.
pub struct ApprovalService {
    pool: PgPool,
}

impl ApprovalService {
    /// Create a new ApprovalService.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Decide a submitted instance.
    ///
    /// Gates run in precondition order: the instance must exist, belong to
    /// the caller's family, the caller must be a parent, and the instance
    /// must still be awaiting review.
    ///
    /// Approval picks the reward path from the submission: cash-out applies
    /// only when the claimant requested it and reported positive minutes,
    /// otherwise the points formula runs with the family's overdue policy.
    /// The status transition, reward write, approval record, profile
    /// progress, and claimant notification all commit in one transaction;
    /// a concurrent second decision loses and gets `AlreadyDecided`.
    pub async fn decide(
        &self,
        instance_id: Uuid,
        parent_id: Uuid,
        family_id: Uuid,
        role: Role,
        request: ApprovalDecisionRequest,
    ) -> Result<ApprovalDecisionResponse, ApprovalError> {
        let instances = ChoreInstanceRepository::new(self.pool.clone());

        let instance = instances
            .find_by_id(instance_id)
            .await?
            .ok_or(ApprovalError::NotFound)?;

        if instance.family_id != family_id {
            return Err(ApprovalError::ForeignFamily);
        }

        if role != Role::Parent {
            return Err(ApprovalError::NotParent);
        }

        let status: InstanceStatus = instance.status.into();
        if status != InstanceStatus::Submitted {
            return Err(ApprovalError::NotSubmitted(status.to_string()));
        }

        let claimant_id = instance.claimed_by.ok_or(ApprovalError::MissingClaimant)?;

        if !request.approve {
            let notification = NewNotification {
                profile_id: claimant_id,
                kind: NotificationKindDb::Rejected,
                title: "Chore Rejected".to_string(),
                body: match request.reason.as_deref() {
                    Some(reason) => format!("\"{}\" was sent back: {}", instance.title, reason),
                    None => format!("\"{}\" was sent back for another try", instance.title),
                },
                payload: json!({ "instanceId": instance.id }),
            };

            instances
                .finalize_rejection(RejectionFinalization {
                    instance_id,
                    parent_id,
                    reason: request.reason.clone(),
                    notification,
                })
                .await?
                .ok_or(ApprovalError::AlreadyDecided)?;

            record_approval_decision("rejected");

            return Ok(ApprovalDecisionResponse {
                success: true,
                action: ApprovalAction::Rejected,
                points_awarded: None,
                cash_cents: None,
            });
        }

        let family = FamilyRepository::new(self.pool.clone())
            .find_by_id(family_id)
            .await?
            .ok_or(ApprovalError::FamilyMissing)?;
        let settings = family.settings();

        let claimant = ProfileRepository::new(self.pool.clone())
            .find_by_id(claimant_id)
            .await?
            .ok_or(ApprovalError::MissingClaimant)?;

        let approved_at = Utc::now();

        let (points, cash_cents, audit) = match instance.minutes_reported.filter(|m| *m > 0) {
            Some(minutes) if instance.cash_out_requested => {
                let reward = cash_out_reward(CashOutInput {
                    base_points: instance.base_points,
                    minutes_reported: minutes,
                    hourly_rate_cents: claimant.hourly_rate_cents,
                    cash_points_percent: settings.cash_points_percent,
                    override_cash_cents: request.override_cash_cents,
                });
                (reward.points, Some(reward.cash_cents), reward.audit)
            }
            _ => {
                let reward = points_reward(PointsInput {
                    base_points: instance.base_points,
                    due_at: instance.due_at,
                    approved_at,
                    grace_days: settings.grace_days,
                    overdue_cap: settings.overdue_cap,
                    override_points: request.override_points,
                });
                (reward.points, None, reward.audit)
            }
        };

        let notification = NewNotification {
            profile_id: claimant_id,
            kind: NotificationKindDb::Approved,
            title: "Chore Approved! 🎉".to_string(),
            body: match cash_cents {
                Some(cents) if cents > 0 => format!(
                    "\"{}\" earned you ${}.{:02}",
                    instance.title,
                    cents / 100,
                    cents % 100
                ),
                _ => format!("\"{}\" earned you {} points", instance.title, points),
            },
            payload: json!({
                "instanceId": instance.id,
                "points": points,
                "cashCents": cash_cents,
            }),
        };

        let approved = instances
            .finalize_approval(ApprovalFinalization {
                instance_id,
                parent_id,
                claimant_id,
                approved_at,
                reason: request.reason.clone(),
                points_awarded: points,
                cash_cents,
                audit: serde_json::to_value(&audit)?,
                notification,
            })
            .await?
            .ok_or(ApprovalError::AlreadyDecided)?;

        record_approval_decision("approved");

        Ok(ApprovalDecisionResponse {
            success: true,
            action: ApprovalAction::Approved,
            points_awarded: approved.points_awarded,
            cash_cents: approved.cash_cents,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApprovalError::NotSubmitted("approved".to_string());
        assert!(err.to_string().contains("not awaiting review"));
        assert!(err.to_string().contains("approved"));

        let err = ApprovalError::AlreadyDecided;
        assert!(err.to_string().contains("already decided"));

        let err = ApprovalError::ForeignFamily;
        assert!(err.to_string().contains("another family"));

        let err = ApprovalError::NotParent;
        assert!(err.to_string().contains("parents"));
    }

    #[test]
    fn test_database_error_conversion() {
        let err: ApprovalError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApprovalError::Database(_)));
    }
}
