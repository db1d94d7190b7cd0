//! Chore template entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Chore, ChoreType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for the chore category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "chore_type", rename_all = "lowercase")]
pub enum ChoreTypeDb {
    Study,
    Household,
    Activity,
}

impl From<ChoreTypeDb> for ChoreType {
    fn from(chore_type: ChoreTypeDb) -> Self {
        match chore_type {
            ChoreTypeDb::Study => ChoreType::Study,
            ChoreTypeDb::Household => ChoreType::Household,
            ChoreTypeDb::Activity => ChoreType::Activity,
        }
    }
}

impl From<ChoreType> for ChoreTypeDb {
    fn from(chore_type: ChoreType) -> Self {
        match chore_type {
            ChoreType::Study => ChoreTypeDb::Study,
            ChoreType::Household => ChoreTypeDb::Household,
            ChoreType::Activity => ChoreTypeDb::Activity,
        }
    }
}

/// Database row mapping for the chores table.
///
/// The `type` column is selected as `chore_type` because `type` is a
/// Rust keyword.
#[derive(Debug, Clone, FromRow)]
pub struct ChoreEntity {
    pub id: Uuid,
    pub family_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub chore_type: ChoreTypeDb,
    pub base_points: i32,
    pub expected_duration_min: Option<i32>,
    pub is_recurring: bool,
    pub rrule: Option<String>,
    pub assignee_id: Option<Uuid>,
    pub created_by: Uuid,
    pub active: bool,
    pub allow_cash_out: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChoreEntity> for Chore {
    fn from(entity: ChoreEntity) -> Self {
        Self {
            id: entity.id,
            family_id: entity.family_id,
            title: entity.title,
            description: entity.description,
            chore_type: entity.chore_type.into(),
            base_points: entity.base_points,
            expected_duration_min: entity.expected_duration_min,
            is_recurring: entity.is_recurring,
            rrule: entity.rrule,
            assignee_id: entity.assignee_id,
            created_by: entity.created_by,
            active: entity.active,
            allow_cash_out: entity.allow_cash_out,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_chore_entity() -> ChoreEntity {
        ChoreEntity {
            id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            title: "Do the dishes".to_string(),
            description: Some("After dinner, load and run the dishwasher".to_string()),
            chore_type: ChoreTypeDb::Household,
            base_points: 10,
            expected_duration_min: Some(20),
            is_recurring: true,
            rrule: Some("FREQ=DAILY".to_string()),
            assignee_id: None,
            created_by: Uuid::new_v4(),
            active: true,
            allow_cash_out: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_chore_entity_to_domain() {
        let entity = create_test_chore_entity();
        let chore: Chore = entity.clone().into();

        assert_eq!(chore.id, entity.id);
        assert_eq!(chore.family_id, entity.family_id);
        assert_eq!(chore.title, entity.title);
        assert_eq!(chore.chore_type, ChoreType::Household);
        assert_eq!(chore.base_points, 10);
        assert_eq!(chore.expected_duration_min, Some(20));
        assert!(chore.is_recurring);
        assert_eq!(chore.rrule.as_deref(), Some("FREQ=DAILY"));
    }

    #[test]
    fn test_chore_entity_non_recurring() {
        let mut entity = create_test_chore_entity();
        entity.is_recurring = false;
        entity.rrule = None;

        let chore: Chore = entity.into();
        assert!(!chore.is_recurring);
        assert!(chore.rrule.is_none());
    }

    #[test]
    fn test_chore_type_db_round_trip() {
        assert_eq!(ChoreTypeDb::from(ChoreType::Study), ChoreTypeDb::Study);
        assert_eq!(ChoreType::from(ChoreTypeDb::Activity), ChoreType::Activity);
    }
}
