//! Family entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Family, FamilyPlan, FamilySettings};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for the family plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "family_plan", rename_all = "lowercase")]
pub enum FamilyPlanDb {
    Free,
    Premium,
}

impl From<FamilyPlanDb> for FamilyPlan {
    fn from(plan: FamilyPlanDb) -> Self {
        match plan {
            FamilyPlanDb::Free => FamilyPlan::Free,
            FamilyPlanDb::Premium => FamilyPlan::Premium,
        }
    }
}

impl From<FamilyPlan> for FamilyPlanDb {
    fn from(plan: FamilyPlan) -> Self {
        match plan {
            FamilyPlan::Free => FamilyPlanDb::Free,
            FamilyPlan::Premium => FamilyPlanDb::Premium,
        }
    }
}

/// Database row mapping for the families table.
#[derive(Debug, Clone, FromRow)]
pub struct FamilyEntity {
    pub id: Uuid,
    pub name: String,
    pub timezone: String,
    pub plan: FamilyPlanDb,
    pub settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FamilyEntity {
    /// Parse the settings document, falling back to defaults for absent
    /// or malformed fields.
    pub fn settings(&self) -> FamilySettings {
        serde_json::from_value(self.settings.clone()).unwrap_or_default()
    }
}

impl From<FamilyEntity> for Family {
    fn from(entity: FamilyEntity) -> Self {
        let settings = entity.settings();
        Self {
            id: entity.id,
            name: entity.name,
            timezone: entity.timezone,
            plan: entity.plan.into(),
            settings,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_family_entity() -> FamilyEntity {
        FamilyEntity {
            id: Uuid::new_v4(),
            name: "The Tanakas".to_string(),
            timezone: "Europe/Prague".to_string(),
            plan: FamilyPlanDb::Free,
            settings: json!({"grace_days": 5, "overdue_cap": 3.0, "cash_points_percent": 10}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_family_entity_to_domain() {
        let entity = create_test_family_entity();
        let family: Family = entity.clone().into();

        assert_eq!(family.id, entity.id);
        assert_eq!(family.name, entity.name);
        assert_eq!(family.timezone, entity.timezone);
        assert_eq!(family.plan, FamilyPlan::Free);
        assert_eq!(family.settings.grace_days, 5);
        assert_eq!(family.settings.overdue_cap, 3.0);
        assert_eq!(family.settings.cash_points_percent, 10);
    }

    #[test]
    fn test_family_entity_settings_defaults_on_empty_document() {
        let mut entity = create_test_family_entity();
        entity.settings = json!({});

        let settings = entity.settings();
        assert_eq!(settings.grace_days, 3);
        assert_eq!(settings.overdue_cap, 2.0);
        assert_eq!(settings.cash_points_percent, 0);
    }

    #[test]
    fn test_family_entity_settings_defaults_on_malformed_document() {
        let mut entity = create_test_family_entity();
        entity.settings = json!("not an object");

        let settings = entity.settings();
        assert_eq!(settings, FamilySettings::default());
    }

    #[test]
    fn test_family_plan_db_round_trip() {
        assert_eq!(FamilyPlanDb::from(FamilyPlan::Premium), FamilyPlanDb::Premium);
        assert_eq!(FamilyPlan::from(FamilyPlanDb::Free), FamilyPlan::Free);
    }
}
