use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;
use utoipa::ToSchema;

use encore_core::AppError;
use encore_models::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};

use super::service::AuthService;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Error envelope returned by every failing endpoint.
#[derive(serde::Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Bad request - validation error or email already exists", body = ErrorResponse),
        (status = 403, description = "Admin role cannot be self-assigned", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = AuthService::register_user(&state, dto).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in and receive an access token
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::login_user(&state, dto).await?;
    Ok(Json(response))
}

/// Log out. Tokens are stateless, so the client simply discards its token.
#[utoipa::path(
    post,
    path = "/api/users/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn logout_user(CurrentUser(user): CurrentUser) -> Json<MessageResponse> {
    tracing::info!("user logged out");
    Json(MessageResponse::new("Logged out successfully"))
}
