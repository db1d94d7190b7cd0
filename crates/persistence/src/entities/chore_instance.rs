//! Chore instance entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{ChoreInstance, InstanceStatus, RewardAudit};
use sqlx::FromRow;
use uuid::Uuid;

use super::chore::ChoreTypeDb;

/// Database enum for the instance lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "instance_status", rename_all = "lowercase")]
pub enum InstanceStatusDb {
    Open,
    Claimed,
    Submitted,
    Approved,
    Rejected,
    Expired,
}

impl From<InstanceStatusDb> for InstanceStatus {
    fn from(status: InstanceStatusDb) -> Self {
        match status {
            InstanceStatusDb::Open => InstanceStatus::Open,
            InstanceStatusDb::Claimed => InstanceStatus::Claimed,
            InstanceStatusDb::Submitted => InstanceStatus::Submitted,
            InstanceStatusDb::Approved => InstanceStatus::Approved,
            InstanceStatusDb::Rejected => InstanceStatus::Rejected,
            InstanceStatusDb::Expired => InstanceStatus::Expired,
        }
    }
}

impl From<InstanceStatus> for InstanceStatusDb {
    fn from(status: InstanceStatus) -> Self {
        match status {
            InstanceStatus::Open => InstanceStatusDb::Open,
            InstanceStatus::Claimed => InstanceStatusDb::Claimed,
            InstanceStatus::Submitted => InstanceStatusDb::Submitted,
            InstanceStatus::Approved => InstanceStatusDb::Approved,
            InstanceStatus::Rejected => InstanceStatusDb::Rejected,
            InstanceStatus::Expired => InstanceStatusDb::Expired,
        }
    }
}

/// Database row mapping for the chore_instances table.
///
/// The `type` column is selected as `chore_type` because `type` is a
/// Rust keyword. The audit column stays raw JSON here and is parsed
/// into the typed document on conversion.
#[derive(Debug, Clone, FromRow)]
pub struct ChoreInstanceEntity {
    pub id: Uuid,
    pub chore_id: Uuid,
    pub family_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub chore_type: ChoreTypeDb,
    pub base_points: i32,
    pub expected_duration_min: Option<i32>,
    pub due_at: DateTime<Utc>,
    pub assignee_id: Option<Uuid>,
    pub status: InstanceStatusDb,
    pub claimed_by: Option<Uuid>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub cash_out_requested: bool,
    pub minutes_reported: Option<i32>,
    pub points_awarded: Option<i32>,
    pub cash_cents: Option<i64>,
    pub proof_urls: Vec<String>,
    pub notes: Option<String>,
    pub audit: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChoreInstanceEntity> for ChoreInstance {
    fn from(entity: ChoreInstanceEntity) -> Self {
        let audit: Option<RewardAudit> = entity
            .audit
            .and_then(|value| serde_json::from_value(value).ok());
        Self {
            id: entity.id,
            chore_id: entity.chore_id,
            family_id: entity.family_id,
            title: entity.title,
            description: entity.description,
            chore_type: entity.chore_type.into(),
            base_points: entity.base_points,
            expected_duration_min: entity.expected_duration_min,
            due_at: entity.due_at,
            assignee_id: entity.assignee_id,
            status: entity.status.into(),
            claimed_by: entity.claimed_by,
            claimed_at: entity.claimed_at,
            completed_at: entity.completed_at,
            approved_at: entity.approved_at,
            approved_by: entity.approved_by,
            cash_out_requested: entity.cash_out_requested,
            minutes_reported: entity.minutes_reported,
            points_awarded: entity.points_awarded,
            cash_cents: entity.cash_cents,
            proof_urls: entity.proof_urls,
            notes: entity.notes,
            audit,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_instance_entity() -> ChoreInstanceEntity {
        ChoreInstanceEntity {
            id: Uuid::new_v4(),
            chore_id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            title: "Take out the trash".to_string(),
            description: None,
            chore_type: ChoreTypeDb::Household,
            base_points: 10,
            expected_duration_min: Some(5),
            due_at: Utc::now(),
            assignee_id: None,
            status: InstanceStatusDb::Open,
            claimed_by: None,
            claimed_at: None,
            completed_at: None,
            approved_at: None,
            approved_by: None,
            cash_out_requested: false,
            minutes_reported: None,
            points_awarded: None,
            cash_cents: None,
            proof_urls: vec![],
            notes: None,
            audit: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_instance_entity_to_domain() {
        let entity = create_test_instance_entity();
        let instance: ChoreInstance = entity.clone().into();

        assert_eq!(instance.id, entity.id);
        assert_eq!(instance.chore_id, entity.chore_id);
        assert_eq!(instance.family_id, entity.family_id);
        assert_eq!(instance.status, InstanceStatus::Open);
        assert!(instance.audit.is_none());
        assert!(instance.proof_urls.is_empty());
    }

    #[test]
    fn test_instance_entity_parses_points_audit() {
        let mut entity = create_test_instance_entity();
        entity.status = InstanceStatusDb::Approved;
        entity.points_awarded = Some(20);
        entity.audit = Some(json!({
            "mode": "points",
            "overdue_days": 6,
            "multiplier": 2.0,
            "grace_days": 3,
            "cap": 2.0,
            "calculated_points": 20,
            "override_applied": false
        }));

        let instance: ChoreInstance = entity.into();
        match instance.audit {
            Some(RewardAudit::Points {
                overdue_days,
                calculated_points,
                override_applied,
                ..
            }) => {
                assert_eq!(overdue_days, 6);
                assert_eq!(calculated_points, 20);
                assert!(!override_applied);
            }
            other => panic!("expected points audit, got {:?}", other),
        }
    }

    #[test]
    fn test_instance_entity_parses_cash_out_audit() {
        let mut entity = create_test_instance_entity();
        entity.status = InstanceStatusDb::Approved;
        entity.cash_cents = Some(900);
        entity.audit = Some(json!({
            "mode": "cash_out",
            "minutes_reported": 30,
            "hourly_rate_cents": 1800,
            "calculated_cash_cents": 900,
            "bonus_points": 0,
            "override_applied": false
        }));

        let instance: ChoreInstance = entity.into();
        match instance.audit {
            Some(RewardAudit::CashOut {
                minutes_reported,
                calculated_cash_cents,
                ..
            }) => {
                assert_eq!(minutes_reported, 30);
                assert_eq!(calculated_cash_cents, 900);
            }
            other => panic!("expected cash out audit, got {:?}", other),
        }
    }

    #[test]
    fn test_instance_entity_ignores_malformed_audit() {
        let mut entity = create_test_instance_entity();
        entity.audit = Some(json!({"mode": "unknown"}));

        let instance: ChoreInstance = entity.into();
        assert!(instance.audit.is_none());
    }

    #[test]
    fn test_instance_status_db_round_trip() {
        for status in [
            InstanceStatus::Open,
            InstanceStatus::Claimed,
            InstanceStatus::Submitted,
            InstanceStatus::Approved,
            InstanceStatus::Rejected,
            InstanceStatus::Expired,
        ] {
            let db: InstanceStatusDb = status.into();
            assert_eq!(InstanceStatus::from(db), status);
        }
    }
}
