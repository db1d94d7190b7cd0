//! Notification routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::notification::{
    ListNotificationsQuery, ListNotificationsResponse, MarkAllReadResponse, Notification,
};
use persistence::repositories::NotificationRepository;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ProfileAuth;

/// List the caller's notifications, newest first.
///
/// GET /api/v1/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: ProfileAuth,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<ListNotificationsResponse>, ApiError> {
    let limit = query.limit.clamp(1, state.config.limits.max_page_size);

    let repo = NotificationRepository::new(state.pool.clone());
    let entities = repo
        .list_for_profile(auth.profile_id, query.unread_only, limit)
        .await?;

    let data: Vec<Notification> = entities.into_iter().map(Into::into).collect();
    let count = data.len();

    Ok(Json(ListNotificationsResponse { data, count }))
}

/// Mark one notification as read.
///
/// POST /api/v1/notifications/:notification_id/read
///
/// Only the addressee can mark their own notifications.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    auth: ProfileAuth,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = NotificationRepository::new(state.pool.clone());

    let updated = repo.mark_read(notification_id, auth.profile_id).await?;
    if !updated {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Mark all of the caller's notifications as read.
///
/// POST /api/v1/notifications/read-all
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    auth: ProfileAuth,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let repo = NotificationRepository::new(state.pool.clone());

    let updated = repo.mark_all_read(auth.profile_id).await?;

    info!(
        profile_id = %auth.profile_id,
        updated = updated,
        "Marked all notifications read"
    );

    Ok(Json(MarkAllReadResponse {
        success: true,
        updated,
    }))
}
