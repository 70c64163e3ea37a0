use anyhow::anyhow;
use tracing::instrument;

use encore_auth::create_access_token;
use encore_core::{AppError, hash_password, verify_password};
use encore_models::{
    AuthResponse, LoginRequest, NewUser, RegisterRequest, UserRole, UserType,
};

use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(state, dto), fields(email = %dto.email))]
    pub async fn register_user(
        state: &AppState,
        dto: RegisterRequest,
    ) -> Result<AuthResponse, AppError> {
        let role = dto.role.unwrap_or_default();
        if role == UserRole::Admin {
            return Err(AppError::forbidden(
                "Admin accounts cannot be self-registered",
            ));
        }

        let existing = state
            .users
            .find_credentials_by_email(&dto.email)
            .await
            .map_err(AppError::bad_request)?;
        if existing.is_some() {
            return Err(AppError::bad_request(anyhow!("User already exists")));
        }

        let password_hash = hash_password(&dto.password, state.password_config.cost)?;

        let user = state
            .users
            .insert(NewUser {
                name: dto.name,
                email: dto.email,
                password_hash,
                phone: dto.phone.filter(|p| !p.is_empty()),
                address: dto.address.filter(|a| !a.is_empty()),
                user_type: UserType::new(role, dto.teacher_data),
            })
            .await
            .map_err(AppError::bad_request)?;

        let access_token = create_access_token(user.id.into_inner(), &state.jwt_config)?;
        tracing::info!(user_id = %user.id, role = %user.role(), "user registered");

        Ok(AuthResponse { access_token, user })
    }

    #[instrument(skip(state, dto), fields(email = %dto.email))]
    pub async fn login_user(state: &AppState, dto: LoginRequest) -> Result<AuthResponse, AppError> {
        let credentials = state
            .users
            .find_credentials_by_email(&dto.email)
            .await
            .map_err(AppError::bad_request)?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(&dto.password, &credentials.password_hash)? {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let user = credentials.user;
        let access_token = create_access_token(user.id.into_inner(), &state.jwt_config)?;

        Ok(AuthResponse { access_token, user })
    }
}
