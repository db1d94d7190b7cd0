//! Leaderboard snapshot and read service.

use chrono::{DateTime, Utc};
use domain::models::leaderboard::{
    LeaderboardEntry, LeaderboardResponse, Period, RefreshLeaderboardResponse, RefreshedPeriod,
};
use domain::services::periods::period_window;
use domain::services::ranking::rank_entries;
use persistence::repositories::{FamilyRepository, LeaderboardRepository};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::middleware::metrics::record_leaderboard_refresh;

/// Service for leaderboard aggregation and reads.
pub struct LeaderboardService {
    pool: PgPool,
}

impl LeaderboardService {
    /// Create a new LeaderboardService.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Serve the board for one family and period.
    ///
    /// The persisted snapshot for the current window wins; when none exists
    /// yet the same aggregation runs live so the board is never stale-empty.
    /// Ranking happens at read time in both cases.
    pub async fn read(
        &self,
        family_id: Uuid,
        period: Period,
        now: DateTime<Utc>,
    ) -> Result<LeaderboardResponse, sqlx::Error> {
        let window = period_window(period, now);
        let repo = LeaderboardRepository::new(self.pool.clone());

        let snapshot = repo
            .snapshot_entries(family_id, period.into(), window.starts_on)
            .await?;

        let (raw, realtime) = if snapshot.is_empty() {
            let live = repo
                .realtime_entries(family_id, window.starts_at, window.ends_at)
                .await?;
            (live, true)
        } else {
            (snapshot, false)
        };

        let entries: Vec<LeaderboardEntry> = raw.into_iter().map(Into::into).collect();
        let entries = rank_entries(entries);

        Ok(LeaderboardResponse {
            period,
            starts_on: window.starts_on,
            ends_on: window.ends_on,
            realtime,
            entries,
        })
    }

    /// Rebuild snapshots for every family across all periods.
    pub async fn refresh_all(
        &self,
        now: DateTime<Utc>,
    ) -> Result<RefreshLeaderboardResponse, sqlx::Error> {
        let families = FamilyRepository::new(self.pool.clone()).list_ids().await?;
        let repo = LeaderboardRepository::new(self.pool.clone());

        let mut processed = Vec::with_capacity(families.len() * Period::ALL.len());

        for family_id in &families {
            for period in Period::ALL {
                let window = period_window(period, now);
                let scores = repo
                    .aggregate_window(*family_id, window.starts_at, window.ends_at)
                    .await?;

                for score in &scores {
                    repo.upsert_snapshot(
                        *family_id,
                        period.into(),
                        window.starts_on,
                        window.ends_on,
                        score,
                    )
                    .await?;
                }

                debug!(
                    family_id = %family_id,
                    period = %period,
                    entries = scores.len(),
                    "Refreshed leaderboard snapshot"
                );

                processed.push(RefreshedPeriod {
                    family: *family_id,
                    period,
                    entries: scores.len(),
                });
            }
        }

        record_leaderboard_refresh(families.len());

        info!(
            families = families.len(),
            windows = processed.len(),
            "Leaderboard snapshots refreshed"
        );

        Ok(RefreshLeaderboardResponse {
            success: true,
            processed,
        })
    }
}
