//! Profile domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a profile within its family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Child,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Parent => write!(f, "parent"),
            Role::Child => write!(f, "child"),
        }
    }
}

/// A family member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub family_id: Uuid,
    pub role: Role,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Hourly rate used for cash-outs; unset means cash-outs earn nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate_cents: Option<i64>,
    pub total_points: i64,
    pub streak_days: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_completion_date: Option<NaiveDate>,
    pub level: i32,
    pub badges: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Parent.to_string(), "parent");
        assert_eq!(Role::Child.to_string(), "child");
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Parent).unwrap(), "\"parent\"");
        assert_eq!(serde_json::to_string(&Role::Child).unwrap(), "\"child\"");
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let profile = Profile {
            id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            role: Role::Child,
            display_name: "Mia".to_string(),
            avatar_url: None,
            hourly_rate_cents: Some(1800),
            total_points: 120,
            streak_days: 4,
            last_completion_date: None,
            level: 2,
            badges: vec!["early-bird".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["displayName"], "Mia");
        assert_eq!(json["hourlyRateCents"], 1800);
        assert_eq!(json["totalPoints"], 120);
        assert!(json.get("avatarUrl").is_none());
    }
}
