//! Application error type with HTTP response conversion.
//!
//! Every stage of the request pipeline reports failures as an [`AppError`]
//! carrying an [`ErrorKind`]. The kind is translated to an HTTP status in
//! exactly one place ([`ErrorKind::status`]) and rendered as
//! `{ "message": "..." }`.
//!
//! # Example
//!
//! ```ignore
//! use encore_core::errors::AppError;
//!
//! let err = AppError::not_found(anyhow::anyhow!("User not found"));
//! assert_eq!(err.status(), StatusCode::NOT_FOUND);
//! ```

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::file_storage::StorageError;

/// Failure categories surfaced to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input or a fault reported by the persistence layer.
    BadRequest,
    /// Missing, invalid or expired credentials, or a token for a deleted account.
    Unauthenticated,
    /// Authenticated but the role is insufficient.
    Forbidden,
    /// Target record absent.
    NotFound,
    /// Unanticipated fault.
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            kind,
            error: err.into(),
        }
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::BadRequest, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::NotFound, err)
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Internal, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, anyhow::anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, anyhow::anyhow!(message.into()))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, anyhow::anyhow!(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// Message shown to the client. Internal faults are logged, not echoed.
    pub fn message(&self) -> String {
        match self.kind {
            ErrorKind::Internal => "Internal server error".to_string(),
            _ => self.error.to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.kind == ErrorKind::Internal {
            tracing::error!(error = ?self.error, "internal error");
        }

        let body = Json(json!({
            "message": self.message()
        }));

        (self.status(), body).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::bad_request(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_to_status() {
        assert_eq!(ErrorKind::BadRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorKind::Internal.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = AppError::internal_error("connection reset by peer at 10.0.0.3");
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = AppError::unauthorized("Not authorized, no token");
        assert_eq!(err.message(), "Not authorized, no token");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_storage_error_is_bad_request() {
        let err: AppError = StorageError::InvalidKey("..".into()).into();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_into_response_body() {
        use axum::body::to_bytes;

        let response = AppError::forbidden("Not authorized as admin").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], "Not authorized as admin");
    }
}
