use axum::{Router, routing::post};

use super::controller::{login_user, logout_user, register_user};
use crate::state::AppState;

/// Public account routes.
pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
}

/// Account routes that need a signed-in user.
pub fn init_session_router() -> Router<AppState> {
    Router::new().route("/logout", post(logout_user))
}
