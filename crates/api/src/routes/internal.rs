//! Internal scheduler-facing routes.
//!
//! These sit behind the service credential check rather than profile JWTs.
//! The platform cron hits them on a fixed cadence; operators can also call
//! them manually with the service key.

use axum::{extract::State, Json};
use chrono::Utc;
use domain::models::chore::SpawnReport;
use domain::models::leaderboard::RefreshLeaderboardResponse;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::leaderboard::LeaderboardService;
use crate::services::spawner::SpawnerService;

/// Materialize due instances from recurring chore templates.
///
/// POST /api/v1/internal/spawn-recurring
pub async fn spawn_recurring(
    State(state): State<AppState>,
) -> Result<Json<SpawnReport>, ApiError> {
    let service = SpawnerService::new(
        state.pool.clone(),
        state.config.limits.spawn_horizon_days,
    );
    let report = service.run(Utc::now()).await?;

    info!(
        processed = report.processed,
        created = report.created,
        failed = report.errors.len(),
        "Recurrence spawn run finished"
    );

    Ok(Json(report))
}

/// Rebuild leaderboard snapshots for every family and period.
///
/// POST /api/v1/internal/refresh-leaderboard
pub async fn refresh_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<RefreshLeaderboardResponse>, ApiError> {
    let service = LeaderboardService::new(state.pool.clone());
    let response = service.refresh_all(Utc::now()).await?;

    info!(
        processed = response.processed.len(),
        "Leaderboard refresh finished"
    );

    Ok(Json(response))
}
