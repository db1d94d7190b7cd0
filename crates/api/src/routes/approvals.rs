//! Approval routes for reviewing submitted chores.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::chore_instance::{
    ApprovalDecisionRequest, ApprovalDecisionResponse, ChoreInstance, PendingApprovalsResponse,
};
use persistence::repositories::ChoreInstanceRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ProfileAuth;
use crate::services::approval::{ApprovalError, ApprovalService};

/// List instances waiting for a decision, oldest submission first.
///
/// GET /api/v1/approvals/pending
///
/// Requires a parent profile.
pub async fn list_pending_approvals(
    State(state): State<AppState>,
    auth: ProfileAuth,
) -> Result<Json<PendingApprovalsResponse>, ApiError> {
    if !auth.is_parent() {
        return Err(ApiError::Forbidden(
            "Only parents can review submitted chores".to_string(),
        ));
    }

    let repo = ChoreInstanceRepository::new(state.pool.clone());
    let entities = repo
        .list_pending_for_family(auth.family_id, state.config.limits.max_page_size)
        .await?;

    let data: Vec<ChoreInstance> = entities.into_iter().map(Into::into).collect();
    let count = data.len();

    info!(
        family_id = %auth.family_id,
        pending = count,
        "Listed pending approvals"
    );

    Ok(Json(PendingApprovalsResponse { data, count }))
}

/// Decide a submitted instance.
///
/// POST /api/v1/instances/:instance_id/approval
///
/// Requires a parent profile. Approving runs the reward calculation and
/// credits the claimant atomically; rejecting records the decision without
/// touching reward fields.
pub async fn decide_instance(
    State(state): State<AppState>,
    auth: ProfileAuth,
    Path(instance_id): Path<Uuid>,
    Json(request): Json<ApprovalDecisionRequest>,
) -> Result<Json<ApprovalDecisionResponse>, ApiError> {
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

    let service = ApprovalService::new(state.pool.clone());

    match service
        .decide(instance_id, auth.profile_id, auth.family_id, auth.role, request)
        .await
    {
        Ok(response) => {
            info!(
                instance_id = %instance_id,
                parent_id = %auth.profile_id,
                action = %response.action,
                points_awarded = ?response.points_awarded,
                "Approval decision recorded"
            );
            Ok(Json(response))
        }
        Err(ApprovalError::NotFound) => Err(ApiError::NotFound("Instance not found".to_string())),
        Err(ApprovalError::ForeignFamily) => Err(ApiError::Forbidden(
            "Instance belongs to another family".to_string(),
        )),
        Err(ApprovalError::NotParent) => Err(ApiError::Forbidden(
            "Only parents can decide submitted chores".to_string(),
        )),
        Err(ApprovalError::NotSubmitted(status)) => Err(ApiError::Conflict(format!(
            "Instance is not awaiting review (status: {})",
            status
        ))),
        Err(ApprovalError::AlreadyDecided) => Err(ApiError::Conflict(
            "Instance was already decided".to_string(),
        )),
        Err(ApprovalError::MissingClaimant) => Err(ApiError::Internal(
            "Submitted instance has no claimant".to_string(),
        )),
        Err(ApprovalError::FamilyMissing) => Err(ApiError::Internal(
            "Family record missing for instance".to_string(),
        )),
        Err(ApprovalError::AuditEncoding(e)) => {
            Err(ApiError::Internal(format!("Failed to encode audit: {}", e)))
        }
        Err(ApprovalError::Database(e)) => Err(e.into()),
    }
}
