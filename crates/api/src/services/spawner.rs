//! Recurring chore spawner.
//!
//! Expands each active template's recurrence rule over a short horizon and
//! inserts the occurrences that do not exist yet.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use domain::models::chore::{SpawnFailure, SpawnReport, SpawnedInstance};
use domain::services::recurrence::expand_rrule;
use persistence::repositories::{ChoreInstanceRepository, ChoreRepository};
use sqlx::PgPool;
use tracing::{debug, error, info, warn};

use crate::middleware::metrics::record_instances_spawned;

/// Service that materializes due instances from recurring templates.
pub struct SpawnerService {
    pool: PgPool,
    horizon_days: i64,
}

impl SpawnerService {
    /// Create a new SpawnerService.
    pub fn new(pool: PgPool, horizon_days: i64) -> Self {
        Self { pool, horizon_days }
    }

    /// Run one spawn pass over `[now, now + horizon]`.
    ///
    /// An occurrence is skipped when any instance of the same chore already
    /// falls on its calendar day; the unique index on (chore_id, due day)
    /// backstops concurrent runs. A chore with a broken rule is recorded in
    /// the report and the batch continues.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<SpawnReport, sqlx::Error> {
        let chores = ChoreRepository::new(self.pool.clone());
        let instances = ChoreInstanceRepository::new(self.pool.clone());

        let templates = chores.list_active_recurring().await?;
        let horizon_end = now + Duration::days(self.horizon_days);

        let mut created = Vec::new();
        let mut errors = Vec::new();

        for template in &templates {
            // list_active_recurring already filters NULL rules
            let Some(rule) = template.rrule.as_deref() else {
                continue;
            };

            let occurrences = match expand_rrule(rule, now, horizon_end) {
                Ok(occurrences) => occurrences,
                Err(e) => {
                    warn!(
                        chore_id = %template.id,
                        error = %e,
                        "Skipping chore with invalid recurrence rule"
                    );
                    errors.push(SpawnFailure {
                        chore_id: template.id,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            for due_at in occurrences {
                let day_start = due_at.date_naive().and_time(NaiveTime::MIN).and_utc();
                let day_end = day_start + Duration::days(1);

                if instances
                    .exists_in_window(template.id, day_start, day_end)
                    .await?
                {
                    continue;
                }

                match instances.insert_from_template(template, due_at).await {
                    Ok(instance) => created.push(SpawnedInstance {
                        id: instance.id,
                        chore_id: instance.chore_id,
                        title: instance.title,
                        due_at: instance.due_at,
                    }),
                    Err(e) => {
                        if is_unique_violation(&e) {
                            debug!(
                                chore_id = %template.id,
                                due_at = %due_at,
                                "Occurrence already spawned by a concurrent run"
                            );
                            continue;
                        }
                        error!(
                            chore_id = %template.id,
                            due_at = %due_at,
                            error = %e,
                            "Failed to insert spawned instance"
                        );
                        errors.push(SpawnFailure {
                            chore_id: template.id,
                            error: e.to_string(),
                        });
                        break;
                    }
                }
            }
        }

        if !created.is_empty() {
            record_instances_spawned(created.len());
        }

        info!(
            processed = templates.len(),
            created = created.len(),
            failed = errors.len(),
            "Recurrence spawn completed"
        );

        Ok(SpawnReport {
            success: true,
            processed: templates.len(),
            created: created.len(),
            instances: created,
            errors,
        })
    }
}

/// Duplicate inserts from concurrent runs surface as 23505 and are not
/// failures.
fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_detection_ignores_other_errors() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }
}
