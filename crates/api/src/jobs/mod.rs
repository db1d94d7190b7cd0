//! Background job scheduler and job implementations.

mod leaderboard_refresh;
mod pool_metrics;
mod scheduler;
mod spawn_recurring;

pub use leaderboard_refresh::LeaderboardRefreshJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::JobScheduler;
pub use spawn_recurring::SpawnRecurringJob;
