//! Administrative commands shared by the `encore-cli` binary.

use anyhow::{Context, anyhow};
use validator::Validate;

use encore_core::hash_password;
use encore_models::{NewUser, RegisterRequest, UserId, UserRole, UserType};

use crate::state::AppState;
use crate::validator::format_errors;

/// Creates an admin account. Admins cannot self-register over HTTP, so this
/// is how the first one comes to exist.
pub async fn create_admin(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<UserId> {
    let request = RegisterRequest {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
        phone: None,
        address: None,
        role: Some(UserRole::Admin),
        teacher_data: None,
    };
    request
        .validate()
        .map_err(|errors| anyhow!(format_errors(&errors)))?;

    let password_hash = hash_password(&request.password, state.password_config.cost)
        .map_err(|e| e.error)?;

    let user = state
        .users
        .insert(NewUser {
            name: request.name,
            email: request.email,
            password_hash,
            phone: None,
            address: None,
            user_type: UserType::new(UserRole::Admin, None),
        })
        .await
        .context("Failed to create admin")?;

    tracing::info!(user_id = %user.id, "admin account created");
    Ok(user.id)
}
