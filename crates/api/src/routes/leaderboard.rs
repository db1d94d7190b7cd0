//! Leaderboard read route.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use domain::models::leaderboard::{LeaderboardQuery, LeaderboardResponse};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ProfileAuth;
use crate::services::leaderboard::LeaderboardService;

/// Family leaderboard for the requested period.
///
/// GET /api/v1/leaderboard
///
/// Serves the persisted snapshot when one exists for the current window
/// and falls back to a live aggregation otherwise.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    auth: ProfileAuth,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let service = LeaderboardService::new(state.pool.clone());
    let response = service
        .read(auth.family_id, query.period, Utc::now())
        .await?;

    Ok(Json(response))
}
