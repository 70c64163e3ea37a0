use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::modules::users::controller::{
    admin_update_user, delete_user, get_profile, get_users, update_profile,
};
use crate::state::AppState;

/// Routes for the signed-in user's own profile.
pub fn init_profile_router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

/// Admin directory routes: list, delete and update any account.
pub fn init_directory_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/{id}", delete(delete_user))
        .route("/profile/{id}", put(admin_update_user))
}
