//! Chore instance routes for listing, claiming, and submitting work.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use domain::models::chore_instance::{
    ChoreInstance, ListInstancesQuery, ListInstancesResponse, SubmitInstanceRequest,
};
use persistence::entities::{NewNotification, NotificationKindDb};
use persistence::repositories::{
    ChoreInstanceRepository, InstanceListQuery, NotificationRepository, ProfileRepository,
};
use serde_json::json;
use shared::pagination::{decode_cursor, encode_cursor};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ProfileAuth;

/// List chore instances in the caller's family.
///
/// GET /api/v1/instances
///
/// Results are ordered by due time ascending. Pass the `cursor` from a
/// previous page to continue; `mine=true` restricts to instances claimed
/// by or assigned to the caller.
pub async fn list_instances(
    State(state): State<AppState>,
    auth: ProfileAuth,
    Query(query): Query<ListInstancesQuery>,
) -> Result<Json<ListInstancesResponse>, ApiError> {
    let (cursor_due_at, cursor_id) = match query.cursor.as_deref() {
        Some(cursor) => {
            let (due_at, id) = decode_cursor(cursor)
                .map_err(|_| ApiError::Validation("Invalid cursor".to_string()))?;
            (Some(due_at), Some(id))
        }
        None => (None, None),
    };

    let limit = query.limit.clamp(1, state.config.limits.max_page_size) as u32;

    let repo = ChoreInstanceRepository::new(state.pool.clone());
    let (entities, has_more) = repo
        .list_for_family(InstanceListQuery {
            family_id: auth.family_id,
            status: query.status.map(Into::into),
            involving: query.mine.then_some(auth.profile_id),
            limit,
            cursor_due_at,
            cursor_id,
        })
        .await?;

    let data: Vec<ChoreInstance> = entities.into_iter().map(Into::into).collect();

    let next_cursor = if has_more {
        data.last().map(|last| encode_cursor(last.due_at, last.id))
    } else {
        None
    };

    Ok(Json(ListInstancesResponse { data, next_cursor }))
}

/// Claim an open instance.
///
/// POST /api/v1/instances/:instance_id/claim
///
/// The first caller wins; a concurrent second claim gets 409.
pub async fn claim_instance(
    State(state): State<AppState>,
    auth: ProfileAuth,
    Path(instance_id): Path<Uuid>,
) -> Result<Json<ChoreInstance>, ApiError> {
    let repo = ChoreInstanceRepository::new(state.pool.clone());

    // Scope to the caller's family before touching state
    let instance = repo
        .find_by_id(instance_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Instance not found".to_string()))?;

    if instance.family_id != auth.family_id {
        return Err(ApiError::NotFound("Instance not found".to_string()));
    }

    let claimed = repo
        .claim(instance_id, auth.profile_id, Utc::now())
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("Instance is not open or was already claimed".to_string())
        })?;

    info!(
        instance_id = %instance_id,
        profile_id = %auth.profile_id,
        "Instance claimed"
    );

    Ok(Json(claimed.into()))
}

/// Submit a claimed instance for parent review.
///
/// POST /api/v1/instances/:instance_id/submit
///
/// Only the claimant may submit. Every parent in the family gets an
/// approval-needed notification.
pub async fn submit_instance(
    State(state): State<AppState>,
    auth: ProfileAuth,
    Path(instance_id): Path<Uuid>,
    Json(request): Json<SubmitInstanceRequest>,
) -> Result<Json<ChoreInstance>, ApiError> {
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

    let submitted = repo
        .submit(
            instance_id,
            auth.profile_id,
            Utc::now(),
            request.cash_out_requested,
            request.minutes_reported,
            &request.proof_urls,
            request.notes.as_deref(),
        )
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("Instance is not claimed by you or was already submitted".to_string())
        })?;

    // Fan out to every parent except the submitter
    let profile_repo = ProfileRepository::new(state.pool.clone());
    let parent_ids = profile_repo.list_parent_ids(auth.family_id).await?;

    let notifications: Vec<NewNotification> = parent_ids
        .into_iter()
        .filter(|id| *id != auth.profile_id)
        .map(|profile_id| NewNotification {
            profile_id,
            kind: NotificationKindDb::ApprovalNeeded,
            title: "Approval needed".to_string(),
            body: format!("\"{}\" was submitted for review", submitted.title),
            payload: json!({
                "instanceId": submitted.id,
                "choreId": submitted.chore_id,
                "submittedBy": auth.profile_id,
            }),
        })
        .collect();

    if !notifications.is_empty() {
        let notification_repo = NotificationRepository::new(state.pool.clone());
        notification_repo.insert_many(&notifications).await?;
    }

    info!(
        instance_id = %instance_id,
        profile_id = %auth.profile_id,
        cash_out_requested = request.cash_out_requested,
        "Instance submitted for review"
    );

    Ok(Json(submitted.into()))
}
