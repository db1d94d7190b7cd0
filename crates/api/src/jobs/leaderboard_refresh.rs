//! Scheduled leaderboard snapshot refresh job.

use chrono::Utc;
use sqlx::PgPool;

use super::scheduler::{Job, JobFrequency};
use crate::services::leaderboard::LeaderboardService;

/// Job that rebuilds leaderboard snapshots for every family and period.
///
/// Reads fall back to live aggregation when a snapshot is missing, so the
/// cadence trades freshness of the fast path against aggregation load.
pub struct LeaderboardRefreshJob {
    pool: PgPool,
}

impl LeaderboardRefreshJob {
    /// Create a new refresh job.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for LeaderboardRefreshJob {
    fn name(&self) -> &'static str {
        "leaderboard_refresh"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(15)
    }

    async fn execute(&self) -> Result<(), String> {
        let service = LeaderboardService::new(self.pool.clone());
        service
            .refresh_all(Utc::now())
            .await
            .map_err(|e| format!("Leaderboard refresh failed: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_frequency() {
        let freq = JobFrequency::Minutes(15);
        assert_eq!(freq.duration().as_secs(), 900);
    }
}
