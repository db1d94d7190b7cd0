//! Time-estimate check route.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::time_check::{TimeCheckRequest, TimeCheckResponse};
use domain::services::time_check::{assess_reported_time, TimeCheckInput};
use persistence::repositories::{ChoreInstanceRepository, ChoreRepository};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ProfileAuth;

/// Check whether a reported duration looks plausible before submitting.
///
/// POST /api/v1/instances/:instance_id/time-check
///
/// Advisory only. The expected duration comes from the instance with the
/// chore template as fallback; the caller's approved history of the same
/// chore nudges the confidence when any exists.
pub async fn time_check(
    State(state): State<AppState>,
    auth: ProfileAuth,
    Path(instance_id): Path<Uuid>,
    Json(request): Json<TimeCheckRequest>,
) -> Result<Json<TimeCheckResponse>, ApiError> {
    // Validate request
    request.validate().map_err(|e| {
        let errors: Vec<String> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| {
                    format!("{}: {}", field, err.message.as_ref().unwrap_or(&"".into()))
                })
            })
            .collect();
        ApiError::Validation(errors.join(", "))
    })?;

    let repo = ChoreInstanceRepository::new(state.pool.clone());

    let instance = repo
        .find_by_id(instance_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Instance not found".to_string()))?;

    if instance.family_id != auth.family_id {
        return Err(ApiError::NotFound("Instance not found".to_string()));
    }

    // Instance carries the duration denormalized at spawn time; fall back to
    // the template for instances spawned before the field was set.
    let expected_minutes = match instance.expected_duration_min {
        Some(minutes) => Some(minutes),
        None => {
            let chore_repo = ChoreRepository::new(state.pool.clone());
            chore_repo
                .find_by_id(instance.chore_id)
                .await?
                .and_then(|chore| chore.expected_duration_min)
        }
    };

    let history = repo
        .history_minutes(
            instance.chore_id,
            auth.profile_id,
            state.config.limits.history_sample_size,
        )
        .await?;

    let response = assess_reported_time(TimeCheckInput {
        expected_minutes,
        reported_minutes: request.reported_minutes,
        history_minutes: &history,
    });

    debug!(
        instance_id = %instance_id,
        profile_id = %auth.profile_id,
        reported_minutes = request.reported_minutes,
        status = %response.status,
        "Time check evaluated"
    );

    Ok(Json(response))
}
