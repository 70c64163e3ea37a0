//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use encore_core::AppError;

/// Claims carried by an access token.
///
/// Only the user id travels in the token; role and profile data are loaded
/// fresh from the store on every request so that deleted accounts and role
/// changes take effect immediately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// Expiration timestamp (Unix seconds)
    pub exp: usize,
    /// Issued-at timestamp (Unix seconds)
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::unauthorized("Not authorized, token failed"))
    }
}
