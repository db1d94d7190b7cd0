//! Domain models for Chore Board.

pub mod approval;
pub mod chore;
pub mod chore_instance;
pub mod family;
pub mod leaderboard;
pub mod notification;
pub mod profile;
pub mod time_check;

pub use approval::ApprovalAction;
pub use chore::{Chore, ChoreType, SpawnFailure, SpawnReport, SpawnedInstance};
pub use chore_instance::{ChoreInstance, InstanceStatus, RewardAudit};
pub use family::{Family, FamilyPlan, FamilySettings};
pub use leaderboard::{LeaderboardEntry, LeaderboardSnapshot, Period};
pub use notification::{Notification, NotificationKind};
pub use profile::{Profile, Role};
pub use time_check::{TimeCheckResponse, TimeCheckStatus};
