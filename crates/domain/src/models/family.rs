//! Family domain models and reward-formula settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription tier of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyPlan {
    Free,
    Premium,
}

impl std::fmt::Display for FamilyPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FamilyPlan::Free => write!(f, "free"),
            FamilyPlan::Premium => write!(f, "premium"),
        }
    }
}

/// Per-family settings parameterizing the approval formula.
///
/// Stored as a JSON document on the family row; absent fields fall back
/// to the documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilySettings {
    /// Full overdue days needed to reach the cap multiplier.
    #[serde(default = "default_grace_days")]
    pub grace_days: i32,
    /// Maximum points multiplier for overdue completions.
    #[serde(default = "default_overdue_cap")]
    pub overdue_cap: f64,
    /// Percentage of base points still awarded on a cash-out (0 = cash only).
    #[serde(default)]
    pub cash_points_percent: i32,
}

fn default_grace_days() -> i32 {
    3
}

fn default_overdue_cap() -> f64 {
    2.0
}

impl Default for FamilySettings {
    fn default() -> Self {
        Self {
            grace_days: default_grace_days(),
            overdue_cap: default_overdue_cap(),
            cash_points_percent: 0,
        }
    }
}

/// A family of parent and child profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub id: Uuid,
    pub name: String,
    /// IANA timezone identifier, kept for client display purposes.
    pub timezone: String,
    pub plan: FamilyPlan,
    pub settings: FamilySettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
