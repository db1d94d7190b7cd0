//! Scheduled recurrence spawn job.

use chrono::Utc;
use sqlx::PgPool;
use tracing::warn;

use super::scheduler::{Job, JobFrequency};
use crate::services::spawner::SpawnerService;

/// Hourly job that materializes upcoming instances of recurring chores.
///
/// Shares its implementation with the internal spawn endpoint, so a cron
/// hit and a scheduler tick are interchangeable.
pub struct SpawnRecurringJob {
    pool: PgPool,
    horizon_days: i64,
}

impl SpawnRecurringJob {
    /// Create a new spawn job.
    pub fn new(pool: PgPool, horizon_days: i64) -> Self {
        Self { pool, horizon_days }
    }
}

#[async_trait::async_trait]
impl Job for SpawnRecurringJob {
    fn name(&self) -> &'static str {
        "spawn_recurring"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let service = SpawnerService::new(self.pool.clone(), self.horizon_days);
        let report = service
            .run(Utc::now())
            .await
            .map_err(|e| format!("Spawn run failed: {}", e))?;

        // Per-chore failures are tolerated but worth surfacing in job logs
        if !report.errors.is_empty() {
            warn!(
                failed = report.errors.len(),
                created = report.created,
                "Spawn run finished with chore failures"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_frequency() {
        let freq = JobFrequency::Hourly;
        assert_eq!(freq.duration().as_secs(), 3600);
    }
}
