//! Service-to-service authentication middleware.
//!
//! Guards internal routes used by the cron scheduler and trusted backend
//! services. Two credentials are accepted:
//!
//! - `x-cron-secret` header matching `security.cron_secret`
//! - `Authorization: Bearer` token matching `security.service_key`
//!
//! An empty configured secret disables that credential entirely.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app::AppState;
use shared::crypto::secrets_match;

/// Header name for the cron scheduler secret.
pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Middleware that requires a valid service credential.
pub async fn require_service_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let security = &state.config.security;

    if security.cron_secret.is_empty() && security.service_key.is_empty() {
        tracing::warn!("Internal route called but no service credentials are configured");
        return service_unavailable_response("Internal endpoints are not configured");
    }

    // Cron scheduler path
    if !security.cron_secret.is_empty() {
        if let Some(presented) = req
            .headers()
            .get(CRON_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            if secrets_match(presented, &security.cron_secret) {
                return next.run(req).await;
            }
            tracing::warn!("Rejected internal request with invalid cron secret");
            return unauthorized_response("Invalid cron secret");
        }
    }

    // Trusted service path
    if !security.service_key.is_empty() {
        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));

        if let Some(presented) = bearer {
            if secrets_match(presented, &security.service_key) {
                return next.run(req).await;
            }
            tracing::warn!("Rejected internal request with invalid service key");
            return unauthorized_response("Invalid service key");
        }
    }

    unauthorized_response("Missing service credential")
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

fn service_unavailable_response(message: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "error": "service_unavailable",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cron_secret_header_constant() {
        assert_eq!(CRON_SECRET_HEADER, "x-cron-secret");
    }

    #[test]
    fn test_unauthorized_response_status() {
        let response = unauthorized_response("Missing service credential");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_service_unavailable_response_status() {
        let response = service_unavailable_response("Internal endpoints are not configured");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_secrets_match_used_for_comparison() {
        // The middleware compares hashed secrets rather than raw strings
        assert!(secrets_match("cron-secret-1", "cron-secret-1"));
        assert!(!secrets_match("cron-secret-1", "cron-secret-2"));
    }
}
