//! Chore template domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a chore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoreType {
    Study,
    Household,
    Activity,
}

impl std::fmt::Display for ChoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChoreType::Study => write!(f, "study"),
            ChoreType::Household => write!(f, "household"),
            ChoreType::Activity => write!(f, "activity"),
        }
    }
}

/// One chore whose expansion failed during a spawn run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnFailure {
    pub chore_id: Uuid,
    pub error: String,
}

/// Summary of one instance created by a spawn run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnedInstance {
    pub id: Uuid,
    pub chore_id: Uuid,
    pub title: String,
    pub due_at: DateTime<Utc>,
}

/// Outcome of one recurrence spawn run.
///
/// Failures are reported per chore; one broken rule never aborts the run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnReport {
    pub success: bool,
    /// Recurring templates examined.
    pub processed: usize,
    /// Instances inserted by this run.
    pub created: usize,
    pub instances: Vec<SpawnedInstance>,
    pub errors: Vec<SpawnFailure>,
}

/// A chore template from which due instances are materialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chore {
    pub id: Uuid,
    pub family_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub chore_type: ChoreType,
    pub base_points: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_duration_min: Option<i32>,
    pub is_recurring: bool,
    /// Recurrence rule; present only when `is_recurring`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
    /// Fixed assignee; unset means open to claim by any child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Uuid>,
    pub created_by: Uuid,
    pub active: bool,
    pub allow_cash_out: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
