//! Role gates for routes behind [`authenticate`](crate::middleware::auth::authenticate).
//!
//! Both gates go through [`role_allows`].

use axum::{extract::Request, middleware::Next, response::IntoResponse, response::Response};

use encore_core::AppError;
use encore_models::UserRole;

use crate::middleware::auth::CurrentUser;

pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];
pub const TEACHER_OR_ADMIN: &[UserRole] = &[UserRole::Admin, UserRole::Teacher];

pub fn role_allows(allowed: &[UserRole], actual: UserRole) -> bool {
    allowed.contains(&actual)
}

/// Denies with `denial` unless a user is attached and holds an allowed role.
pub fn check_role(
    current: Option<&CurrentUser>,
    allowed: &[UserRole],
    denial: &str,
) -> Result<(), AppError> {
    match current {
        Some(CurrentUser(user)) if role_allows(allowed, user.role()) => Ok(()),
        Some(CurrentUser(user)) => {
            tracing::debug!(user_id = %user.id, role = %user.role(), "role gate denied");
            Err(AppError::forbidden(denial))
        }
        None => Err(AppError::forbidden(denial)),
    }
}

pub async fn require_roles(
    req: Request,
    next: Next,
    allowed: &[UserRole],
    denial: &str,
) -> Result<Response, AppError> {
    check_role(req.extensions().get::<CurrentUser>(), allowed, denial)?;
    Ok(next.run(req).await)
}

/// Middleware for admin-only routes.
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/", get(get_users))
///     .route_layer(middleware::from_fn(require_admin));
/// ```
pub async fn require_admin(req: Request, next: Next) -> Response {
    match require_roles(req, next, ADMIN_ONLY, "Not authorized as admin").await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Middleware for routes open to teachers and admins.
pub async fn require_teacher(req: Request, next: Next) -> Response {
    match require_roles(
        req,
        next,
        TEACHER_OR_ADMIN,
        "Not authorized as teacher or admin",
    )
    .await
    {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
