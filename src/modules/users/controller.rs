use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use encore_core::AppError;
use encore_models::{MessageResponse, ProfileResponse, UpdateActor, UpdateProfileDto, User};

use crate::middleware::auth::CurrentUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::form::ProfileForm;
use crate::modules::users::service::UserService;
use crate::state::AppState;

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "User profile", body = User),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_profile(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// Update the authenticated user's profile (JSON or multipart with `cover_image`)
#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body(
        content = UpdateProfileDto,
        description = "JSON body, or multipart/form-data with an optional `cover_image` file"
    ),
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Bad request - validation or storage error", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    form: ProfileForm,
) -> Result<Json<ProfileResponse>, AppError> {
    let response = UserService::update_profile(&state, user.id, UpdateActor::Owner, form).await?;
    Ok(Json(response))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users in creation order", body = Vec<User>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin role required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn get_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::get_users(&state).await?;
    Ok(Json(users))
}

/// Delete a user (admin only)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = String, Path, description = "User ID (UUID)")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Malformed user id", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin role required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = UserService::parse_user_id(&id)?;
    UserService::delete_user(&state, id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Update any user's profile (admin only)
#[utoipa::path(
    put,
    path = "/api/users/profile/{id}",
    params(
        ("id" = String, Path, description = "User ID (UUID)")
    ),
    request_body(
        content = UpdateProfileDto,
        description = "JSON body, or multipart/form-data with an optional `cover_image` file; `password` is ignored"
    ),
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Bad request - validation or storage error", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin role required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, form))]
pub async fn admin_update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: ProfileForm,
) -> Result<Json<ProfileResponse>, AppError> {
    let id = UserService::parse_user_id(&id)?;
    let response = UserService::update_profile(&state, id, UpdateActor::Admin, form).await?;
    Ok(Json(response))
}
