//! Leaderboard repository for database operations.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AggregatedScoreEntity, LeaderboardEntryEntity, PeriodDb};
use crate::metrics::QueryTimer;

/// Repository for leaderboard database operations.
#[derive(Clone)]
pub struct LeaderboardRepository {
    pool: PgPool,
}

impl LeaderboardRepository {
    /// Creates a new LeaderboardRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Aggregate approved completions per claimant inside a window.
    ///
    /// Both window bounds are inclusive, matching the period windows the
    /// refresh computes.
    pub async fn aggregate_window(
        &self,
        family_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AggregatedScoreEntity>, sqlx::Error> {
        let timer = QueryTimer::new("aggregate_leaderboard_window");
        let result = sqlx::query_as::<_, AggregatedScoreEntity>(
            r#"
            SELECT claimed_by AS profile_id,
                   COALESCE(SUM(points_awarded), 0) AS points,
                   COUNT(*) AS chores_completed,
                   MIN(approved_at) AS earliest_completion
            FROM chore_instances
            WHERE family_id = $1
              AND status = 'approved'
              AND claimed_by IS NOT NULL
              AND approved_at >= $2
              AND approved_at <= $3
            GROUP BY claimed_by
            "#,
        )
        .bind(family_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert or refresh one snapshot row.
    ///
    /// A later refresh of the same (family, period, window start, profile)
    /// overwrites the previous totals instead of duplicating the row.
    pub async fn upsert_snapshot(
        &self,
        family_id: Uuid,
        period: PeriodDb,
        starts_on: NaiveDate,
        ends_on: NaiveDate,
        score: &AggregatedScoreEntity,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("upsert_leaderboard_snapshot");
        let result = sqlx::query(
            r#"
            INSERT INTO leaderboard_snapshots (family_id, period, starts_on, ends_on,
                                               profile_id, points, chores_completed,
                                               earliest_completion)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (family_id, period, starts_on, profile_id)
            DO UPDATE SET points = EXCLUDED.points,
                          chores_completed = EXCLUDED.chores_completed,
                          earliest_completion = EXCLUDED.earliest_completion,
                          ends_on = EXCLUDED.ends_on,
                          updated_at = NOW()
            "#,
        )
        .bind(family_id)
        .bind(period)
        .bind(starts_on)
        .bind(ends_on)
        .bind(score.profile_id)
        .bind(score.points)
        .bind(score.chores_completed)
        .bind(score.earliest_completion)
        .execute(&self.pool)
        .await
        .map(|_| ());
        timer.record();
        result
    }

    /// Read the snapshot rows for a family and window, joined with
    /// profile details.
    pub async fn snapshot_entries(
        &self,
        family_id: Uuid,
        period: PeriodDb,
        starts_on: NaiveDate,
    ) -> Result<Vec<LeaderboardEntryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("read_leaderboard_snapshot");
        let result = sqlx::query_as::<_, LeaderboardEntryEntity>(
            r#"
            SELECT s.profile_id, p.display_name, p.avatar_url, s.points,
                   s.chores_completed, s.earliest_completion
            FROM leaderboard_snapshots s
            JOIN profiles p ON p.id = s.profile_id
            WHERE s.family_id = $1 AND s.period = $2 AND s.starts_on = $3
            "#,
        )
        .bind(family_id)
        .bind(period)
        .bind(starts_on)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Aggregate the window directly, bypassing snapshots.
    ///
    /// Serves reads for windows no refresh has covered yet.
    pub async fn realtime_entries(
        &self,
        family_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LeaderboardEntryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("realtime_leaderboard_entries");
        let result = sqlx::query_as::<_, LeaderboardEntryEntity>(
            r#"
            SELECT i.claimed_by AS profile_id, p.display_name, p.avatar_url,
                   COALESCE(SUM(i.points_awarded), 0) AS points,
                   COUNT(*) AS chores_completed,
                   MIN(i.approved_at) AS earliest_completion
            FROM chore_instances i
            JOIN profiles p ON p.id = i.claimed_by
            WHERE i.family_id = $1
              AND i.status = 'approved'
              AND i.approved_at >= $2
              AND i.approved_at <= $3
            GROUP BY i.claimed_by, p.display_name, p.avatar_url
            "#,
        )
        .bind(family_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_leaderboard_repository_new() {
        // This is a structural test - we can't test actual database operations without a test DB
    }
}
