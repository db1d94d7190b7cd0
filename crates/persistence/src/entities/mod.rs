//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod chore;
pub mod chore_instance;
pub mod family;
pub mod leaderboard_snapshot;
pub mod notification;
pub mod profile;

pub use chore::{ChoreEntity, ChoreTypeDb};
pub use chore_instance::{ChoreInstanceEntity, InstanceStatusDb};
pub use family::{FamilyEntity, FamilyPlanDb};
pub use leaderboard_snapshot::{
    AggregatedScoreEntity, LeaderboardEntryEntity, LeaderboardSnapshotEntity, PeriodDb,
};
pub use notification::{NewNotification, NotificationEntity, NotificationKindDb};
pub use profile::{ProfileEntity, RoleDb};
