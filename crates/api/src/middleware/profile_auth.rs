//! Profile JWT authentication middleware.
//!
//! Provides middleware for requiring JWT-based profile authentication on routes.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use domain::models::Role;
use shared::jwt::JwtConfig;

/// Authenticated profile information extracted from JWT.
#[derive(Debug, Clone)]
pub struct ProfileAuth {
    /// Profile ID from the JWT subject claim.
    pub profile_id: Uuid,
    /// Family the profile belongs to.
    pub family_id: Uuid,
    /// Role within the family, used for parent-only routes.
    pub role: Role,
    /// JWT ID (jti) for session tracking.
    #[allow(dead_code)] // Carried for audit logging
    pub jti: String,
}

impl ProfileAuth {
    /// Validates an access token and returns profile authentication info.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let profile_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| "Invalid profile ID in token".to_string())?;

        let family_id = Uuid::parse_str(&claims.family_id)
            .map_err(|_| "Invalid family ID in token".to_string())?;

        let role = match claims.role.as_str() {
            "parent" => Role::Parent,
            "child" => Role::Child,
            other => return Err(format!("Unknown role in token: {}", other)),
        };

        Ok(ProfileAuth {
            profile_id,
            family_id,
            role,
            jti: claims.jti,
        })
    }

    /// Creates a JwtConfig from JwtAuthConfig.
    pub fn create_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, String> {
        JwtConfig::with_leeway(
            &config.private_key,
            &config.public_key,
            config.access_token_expiry_secs,
            config.leeway_secs,
        )
        .map_err(|e| format!("Failed to initialize JWT config: {}", e))
    }

    /// Returns true when the profile may act as a parent.
    pub fn is_parent(&self) -> bool {
        self.role == Role::Parent
    }
}

/// Middleware that requires JWT profile authentication.
///
/// This middleware validates the Bearer token in the Authorization header
/// and rejects requests without a valid JWT. Authenticated profile information
/// is stored in request extensions for use by downstream handlers.
pub async fn require_profile_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Extract Bearer token from Authorization header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    // Create JWT config
    let jwt_config = match ProfileAuth::create_jwt_config(&state.config.jwt) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to create JWT config: {}", e);
            return internal_error_response("Authentication service unavailable");
        }
    };

    // Validate the token
    match ProfileAuth::validate(&jwt_config, token) {
        Ok(auth) => {
            // Store authentication info in request extensions
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

/// Helper to create unauthorized response.
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

/// Helper to create internal error response.
fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}
