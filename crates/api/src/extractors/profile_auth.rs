//! Profile JWT authentication extractor.
//!
//! Provides an Axum extractor for validating JWT tokens from requests.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::profile_auth::ProfileAuth as ProfileAuthData;
use domain::models::Role;

/// Authenticated profile information from JWT.
///
/// This extractor validates the Bearer token in the Authorization header
/// and provides access to the authenticated profile's details.
#[derive(Debug, Clone)]
pub struct ProfileAuth {
    /// Profile ID from the JWT subject claim.
    pub profile_id: Uuid,
    /// Family the profile belongs to.
    pub family_id: Uuid,
    /// Role within the family.
    pub role: Role,
    /// JWT ID (jti) for session tracking.
    #[allow(dead_code)] // Carried for audit logging
    pub jti: String,
}

impl ProfileAuth {
    /// Returns true when the profile may act as a parent.
    pub fn is_parent(&self) -> bool {
        self.role == Role::Parent
    }
}

impl From<ProfileAuthData> for ProfileAuth {
    fn from(data: ProfileAuthData) -> Self {
        Self {
            profile_id: data.profile_id,
            family_id: data.family_id,
            role: data.role,
            jti: data.jti,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ProfileAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // First, check if auth info was already inserted by middleware
        if let Some(auth) = parts.extensions.get::<ProfileAuthData>() {
            return Ok(auth.clone().into());
        }

        // Otherwise, extract and validate the token directly
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        if !auth_header.starts_with("Bearer ") {
            return Err(ApiError::Unauthorized(
                "Invalid Authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        // Create JWT config
        let jwt_config =
            ProfileAuthData::create_jwt_config(&state.config.jwt).map_err(ApiError::Internal)?;

        // Validate the token
        let auth_data = ProfileAuthData::validate(&jwt_config, token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(auth_data.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_auth_struct() {
        let auth = ProfileAuth {
            profile_id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            role: Role::Parent,
            jti: "test_jti".to_string(),
        };
        assert!(auth.is_parent());
        assert!(!auth.jti.is_empty());
    }

    #[test]
    fn test_profile_auth_child_is_not_parent() {
        let auth = ProfileAuth {
            profile_id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            role: Role::Child,
            jti: "test_jti".to_string(),
        };
        assert!(!auth.is_parent());
    }

    #[test]
    fn test_profile_auth_clone() {
        let auth = ProfileAuth {
            profile_id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            role: Role::Child,
            jti: "test_jti".to_string(),
        };
        let cloned = auth.clone();
        assert_eq!(auth.profile_id, cloned.profile_id);
        assert_eq!(auth.family_id, cloned.family_id);
        assert_eq!(auth.jti, cloned.jti);
    }

    #[test]
    fn test_profile_auth_from_middleware_data() {
        let data = ProfileAuthData {
            profile_id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            role: Role::Parent,
            jti: "test_jti".to_string(),
        };
        let auth: ProfileAuth = data.clone().into();
        assert_eq!(auth.profile_id, data.profile_id);
        assert_eq!(auth.role, Role::Parent);
    }
}
