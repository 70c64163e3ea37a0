//! Access token creation and verification (HS256, shared secret).
//!
//! Verification failures are deliberately collapsed into a single
//! unauthenticated error: callers never learn whether a token was expired,
//! malformed or signed with another key.
//!
//! # Example
//!
//! ```ignore
//! use encore_auth::{create_access_token, verify_token};
//! use encore_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use encore_config::JwtConfig;
use encore_core::AppError;

use crate::claims::Claims;

/// Creates an access token for `user_id` valid for the configured lifetime.
pub fn create_access_token(user_id: Uuid, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    encode_claims(
        &Claims {
            sub: user_id.to_string(),
            exp,
            iat: now,
        },
        jwt_config,
    )
}

/// Signs arbitrary claims with the configured secret.
pub fn encode_claims(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry, returning the embedded claims.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "token verification failed");
        AppError::unauthorized("Not authorized, token failed")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn test_create_and_verify() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let token = create_access_token(user_id, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_token_garbage() {
        let config = get_test_jwt_config();
        let err = verify_token("invalid-token", &config).unwrap_err();
        assert_eq!(err.message(), "Not authorized, token failed");
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let token = create_access_token(Uuid::new_v4(), &config).unwrap();

        let wrong_config = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            access_token_expiry: 3600,
        };

        assert!(verify_token(&token, &wrong_config).is_err());
    }

    #[test]
    fn test_verify_token_expired() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;
        let token = encode_claims(
            &Claims {
                sub: Uuid::new_v4().to_string(),
                exp: now - 3600,
                iat: now - 7200,
            },
            &config,
        )
        .unwrap();

        let err = verify_token(&token, &config).unwrap_err();
        assert_eq!(err.status().as_u16(), 401);
    }
}
