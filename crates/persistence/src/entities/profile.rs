//! Profile entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{Profile, Role};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for the profile role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "profile_role", rename_all = "lowercase")]
pub enum RoleDb {
    Parent,
    Child,
}

impl From<RoleDb> for Role {
    fn from(role: RoleDb) -> Self {
        match role {
            RoleDb::Parent => Role::Parent,
            RoleDb::Child => Role::Child,
        }
    }
}

impl From<Role> for RoleDb {
    fn from(role: Role) -> Self {
        match role {
            Role::Parent => RoleDb::Parent,
            Role::Child => RoleDb::Child,
        }
    }
}

/// Database row mapping for the profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub family_id: Uuid,
    pub role: RoleDb,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub hourly_rate_cents: Option<i64>,
    pub total_points: i64,
    pub streak_days: i32,
    pub last_completion_date: Option<NaiveDate>,
    pub level: i32,
    pub badges: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileEntity {
    /// Parse the badges document, falling back to an empty list when the
    /// stored value is not a string array.
    pub fn badges(&self) -> Vec<String> {
        serde_json::from_value(self.badges.clone()).unwrap_or_default()
    }
}

impl From<ProfileEntity> for Profile {
    fn from(entity: ProfileEntity) -> Self {
        let badges = entity.badges();
        Self {
            id: entity.id,
            family_id: entity.family_id,
            role: entity.role.into(),
            display_name: entity.display_name,
            avatar_url: entity.avatar_url,
            hourly_rate_cents: entity.hourly_rate_cents,
            total_points: entity.total_points,
            streak_days: entity.streak_days,
            last_completion_date: entity.last_completion_date,
            level: entity.level,
            badges,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
