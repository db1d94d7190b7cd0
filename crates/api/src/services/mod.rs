//! Business workflow services shared by routes and jobs.

pub mod approval;
pub mod leaderboard;
pub mod spawner;

#[allow(unused_imports)] // Used in routes
pub use approval::ApprovalService;
#[allow(unused_imports)] // Used in routes and jobs
pub use leaderboard::LeaderboardService;
#[allow(unused_imports)] // Used in routes and jobs
pub use spawner::SpawnerService;
