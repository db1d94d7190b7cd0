//! Notification entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Notification, NotificationKind};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for the notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
pub enum NotificationKindDb {
    ReminderDue,
    ApprovalNeeded,
    Streak,
    GoalProgress,
    Approved,
    Rejected,
    LevelUp,
}

impl From<NotificationKindDb> for NotificationKind {
    fn from(kind: NotificationKindDb) -> Self {
        match kind {
            NotificationKindDb::ReminderDue => NotificationKind::ReminderDue,
            NotificationKindDb::ApprovalNeeded => NotificationKind::ApprovalNeeded,
            NotificationKindDb::Streak => NotificationKind::Streak,
            NotificationKindDb::GoalProgress => NotificationKind::GoalProgress,
            NotificationKindDb::Approved => NotificationKind::Approved,
            NotificationKindDb::Rejected => NotificationKind::Rejected,
            NotificationKindDb::LevelUp => NotificationKind::LevelUp,
        }
    }
}

impl From<NotificationKind> for NotificationKindDb {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::ReminderDue => NotificationKindDb::ReminderDue,
            NotificationKind::ApprovalNeeded => NotificationKindDb::ApprovalNeeded,
            NotificationKind::Streak => NotificationKindDb::Streak,
            NotificationKind::GoalProgress => NotificationKindDb::GoalProgress,
            NotificationKind::Approved => NotificationKindDb::Approved,
            NotificationKind::Rejected => NotificationKindDb::Rejected,
            NotificationKind::LevelUp => NotificationKindDb::LevelUp,
        }
    }
}

/// Database row mapping for the notifications table.
///
/// The `type` column is selected as `kind` because `type` is a Rust
/// keyword.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub kind: NotificationKindDb,
    pub title: String,
    pub body: String,
    pub payload: serde_json::Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationEntity> for Notification {
    fn from(entity: NotificationEntity) -> Self {
        Self {
            id: entity.id,
            profile_id: entity.profile_id,
            kind: entity.kind.into(),
            title: entity.title,
            body: entity.body,
            payload: entity.payload,
            read: entity.read,
            created_at: entity.created_at,
        }
    }
}

/// Input for inserting a notification row.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub profile_id: Uuid,
    pub kind: NotificationKindDb,
    pub title: String,
    pub body: String,
    pub payload: serde_json::Value,
}
