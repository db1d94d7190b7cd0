//! JWT token utilities using RS256 algorithm.
//!
//! This module provides JWT token generation and validation using RS256
//! (RSA-SHA256) asymmetric signing. Tokens are scoped to one profile and
//! carry the profile's family and role so handlers can authorize without a
//! database round trip.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// JWT token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (profile ID)
    pub sub: String,
    /// Family the profile belongs to
    pub family_id: String,
    /// Role within the family ("parent" or "child")
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID (unique token identifier for revocation)
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Clone)]
pub struct JwtConfig {
    /// RSA private key in PEM format for signing tokens
    encoding_key: EncodingKey,
    /// RSA public key in PEM format for validating tokens
    decoding_key: DecodingKey,
    /// Access token expiration in seconds (default: 900 = 15 minutes)
    pub access_token_expiry_secs: i64,
    /// Leeway in seconds for clock skew tolerance (default: 30)
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

impl JwtConfig {
    /// Creates a new JwtConfig from an RSA key pair in PEM format.
    ///
    /// # Arguments
    /// * `private_key_pem` - RSA private key in PEM format
    /// * `public_key_pem` - RSA public key in PEM format
    /// * `access_token_expiry_secs` - Access token expiration in seconds
    pub fn new(
        private_key_pem: &str,
        public_key_pem: &str,
        access_token_expiry_secs: i64,
    ) -> Result<Self, JwtError> {
        Self::with_leeway(
            private_key_pem,
            public_key_pem,
            access_token_expiry_secs,
            DEFAULT_LEEWAY_SECS,
        )
    }

    /// Creates a new JwtConfig from an RSA key pair with custom leeway.
    ///
    /// # Arguments
    /// * `private_key_pem` - RSA private key in PEM format
    /// * `public_key_pem` - RSA public key in PEM format
    /// * `access_token_expiry_secs` - Access token expiration in seconds
    /// * `leeway_secs` - Leeway in seconds for clock skew tolerance
    pub fn with_leeway(
        private_key_pem: &str,
        public_key_pem: &str,
        access_token_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?;

        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            access_token_expiry_secs,
            leeway_secs,
        })
    }

    /// Creates a JwtConfig for testing with HS256 symmetric key.
    /// DO NOT use in production - only for tests.
    #[cfg(test)]
    pub fn new_for_testing(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_secs: 900,
            leeway_secs: 0, // Strict for testing - no leeway
        }
    }

    /// Generates an access token for the given profile.
    ///
    /// Returns the encoded token and its `jti`.
    pub fn generate_access_token(
        &self,
        profile_id: Uuid,
        family_id: Uuid,
        role: &str,
    ) -> Result<(String, String), JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();
        let exp = (now + Duration::seconds(self.access_token_expiry_secs)).timestamp();

        let claims = Claims {
            sub: profile_id.to_string(),
            family_id: family_id.to_string(),
            role: role.to_string(),
            exp,
            iat: now.timestamp(),
            jti: jti.clone(),
        };

        // Use RS256 for production, but tests may use HS256
        let header = Header::new(self.algorithm());

        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, jti))
    }

    /// Validates a token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm());
        validation.validate_exp = true;
        // Leeway allows for minor clock differences between client and server
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Returns the algorithm used by this config.
    /// Tests use HS256, production uses RS256.
    fn algorithm(&self) -> Algorithm {
        #[cfg(test)]
        {
            Algorithm::HS256
        }
        #[cfg(not(test))]
        {
            Algorithm::RS256
        }
    }
}

/// Extracts the profile ID from validated claims.
pub fn extract_profile_id(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidToken)
}

/// Extracts the family ID from validated claims.
pub fn extract_family_id(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.family_id).map_err(|_| JwtError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> JwtConfig {
        JwtConfig::new_for_testing("test_secret_key_for_jwt_testing_12345")
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = create_test_config();
        let profile_id = Uuid::new_v4();
        let family_id = Uuid::new_v4();

        let (token, jti) = config
            .generate_access_token(profile_id, family_id, "parent")
            .unwrap();
        assert!(!token.is_empty());
        assert!(!jti.is_empty());

        let claims = config.validate_token(&token).unwrap();
        assert_eq!(claims.sub, profile_id.to_string());
        assert_eq!(claims.family_id, family_id.to_string());
        assert_eq!(claims.role, "parent");
        assert_eq!(claims.jti, jti);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut config = create_test_config();
        config.access_token_expiry_secs = -10;

        let (token, _) = config
            .generate_access_token(Uuid::new_v4(), Uuid::new_v4(), "child")
            .unwrap();

        let result = config.validate_token(&token);
        assert!(matches!(result, Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let config = create_test_config();
        let (token, _) = config
            .generate_access_token(Uuid::new_v4(), Uuid::new_v4(), "parent")
            .unwrap();

        // Flip a character in the payload section
        let mut tampered = token.clone();
        let mid = tampered.len() / 2;
        let replacement = if tampered.as_bytes()[mid] == b'a' { 'b' } else { 'a' };
        tampered.replace_range(mid..mid + 1, &replacement.to_string());

        assert!(config.validate_token(&tampered).is_err());
    }

    #[test]
    fn test_token_from_different_key_is_rejected() {
        let config_a = create_test_config();
        let config_b = JwtConfig::new_for_testing("a_completely_different_secret_key");

        let (token, _) = config_a
            .generate_access_token(Uuid::new_v4(), Uuid::new_v4(), "parent")
            .unwrap();

        assert!(config_b.validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let config = create_test_config();
        assert!(config.validate_token("not.a.token").is_err());
        assert!(config.validate_token("").is_err());
    }

    #[test]
    fn test_extract_profile_id() {
        let config = create_test_config();
        let profile_id = Uuid::new_v4();
        let (token, _) = config
            .generate_access_token(profile_id, Uuid::new_v4(), "child")
            .unwrap();

        let claims = config.validate_token(&token).unwrap();
        assert_eq!(extract_profile_id(&claims).unwrap(), profile_id);
    }

    #[test]
    fn test_extract_family_id() {
        let config = create_test_config();
        let family_id = Uuid::new_v4();
        let (token, _) = config
            .generate_access_token(Uuid::new_v4(), family_id, "child")
            .unwrap();

        let claims = config.validate_token(&token).unwrap();
        assert_eq!(extract_family_id(&claims).unwrap(), family_id);
    }

    #[test]
    fn test_extract_profile_id_invalid_sub() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            family_id: Uuid::new_v4().to_string(),
            role: "parent".to_string(),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        };
        assert!(matches!(
            extract_profile_id(&claims),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_each_token_gets_unique_jti() {
        let config = create_test_config();
        let profile_id = Uuid::new_v4();
        let family_id = Uuid::new_v4();

        let (_, jti1) = config
            .generate_access_token(profile_id, family_id, "parent")
            .unwrap();
        let (_, jti2) = config
            .generate_access_token(profile_id, family_id, "parent")
            .unwrap();
        assert_ne!(jti1, jti2);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = create_test_config();
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test_secret_key"));
    }

    #[test]
    fn test_invalid_pem_is_rejected() {
        let result = JwtConfig::new("not a pem", "also not a pem", 900);
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }
}
