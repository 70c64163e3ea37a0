//! Request pipeline stages.
//!
//! - [`auth`]: bearer token verification and identity loading
//! - [`role`]: role gates that run after authentication
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::authenticate`] verifies the token, loads the user from the
//!    store and attaches a [`auth::CurrentUser`] to the request
//! 3. [`role::require_admin`] or [`role::require_teacher`] checks the
//!    attached user's role
//! 4. The handler runs, reading the user through the `CurrentUser` extractor
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use crate::middleware::{auth::authenticate, role::require_admin};
//!
//! let admin_routes = Router::new()
//!     .route("/", get(get_users))
//!     .route_layer(middleware::from_fn(require_admin))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
//! ```

pub mod auth;
pub mod role;
