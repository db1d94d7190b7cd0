//! Repository implementations for database operations.

pub mod chore;
pub mod chore_instance;
pub mod family;
pub mod leaderboard;
pub mod notification;
pub mod profile;

pub use chore::ChoreRepository;
pub use chore_instance::{
    ApprovalFinalization, ChoreInstanceRepository, InstanceListQuery, RejectionFinalization,
};
pub use family::FamilyRepository;
pub use leaderboard::LeaderboardRepository;
pub use notification::NotificationRepository;
pub use profile::ProfileRepository;
