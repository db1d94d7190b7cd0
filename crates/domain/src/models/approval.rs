//! Approval decision domain model.
//!
//! The approvals table itself is append-only and written inside the
//! finalize transactions; only the action enum crosses the wire.

use serde::{Deserialize, Serialize};

/// Decision recorded by an approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    Approved,
    Rejected,
}

impl std::fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalAction::Approved => write!(f, "approved"),
            ApprovalAction::Rejected => write!(f, "rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        assert_eq!(ApprovalAction::Approved.to_string(), "approved");
        assert_eq!(ApprovalAction::Rejected.to_string(), "rejected");
    }

    #[test]
    fn test_action_serialization() {
        assert_eq!(
            serde_json::to_string(&ApprovalAction::Approved).unwrap(),
            "\"approved\""
        );
        assert_eq!(
            serde_json::to_string(&ApprovalAction::Rejected).unwrap(),
            "\"rejected\""
        );
    }
}
