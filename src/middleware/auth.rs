use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use encore_auth::verify_token;
use encore_core::AppError;
use encore_models::{User, UserId};

use crate::state::AppState;

pub const NO_TOKEN: &str = "Not authorized, no token";
pub const TOKEN_FAILED: &str = "Not authorized, token failed";

/// The authenticated account, loaded fresh from the store for this request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Extracts the raw token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| AppError::unauthorized(NO_TOKEN))
}

/// Resolves the request's bearer token to a stored user.
///
/// A token for a deleted account is an authentication failure, not a 404.
pub async fn load_identity(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let token = bearer_token(headers)?;
    let claims = verify_token(token, &state.jwt_config)?;
    let user_id = UserId::from(claims.user_id()?);

    match state.users.find_by_id(user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(AppError::unauthorized("User not found")),
        Err(e) => {
            tracing::warn!(error = ?e, %user_id, "identity lookup failed");
            Err(AppError::unauthorized(TOKEN_FAILED))
        }
    }
}

/// Middleware for routes that require a signed-in user.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = load_identity(&state, req.headers()).await?;
    tracing::debug!(user_id = %user.id, role = %user.role(), "request authenticated");

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized(NO_TOKEN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracts_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.message(), NO_TOKEN);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        assert!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(&headers_with("bearer abc")).is_err());
    }

    #[test]
    fn test_bearer_token_empty() {
        let err = bearer_token(&headers_with("Bearer ")).unwrap_err();
        assert_eq!(err.message(), NO_TOKEN);
    }
}
