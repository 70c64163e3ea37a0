use std::any::Any;

use anyhow::anyhow;
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    services::ServeDir,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

use encore_config::{CorsConfig, UPLOADS_ROUTE};
use encore_core::AppError;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::auth::authenticate;
use crate::middleware::role::require_admin;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::router::{init_auth_router, init_session_router};
use crate::modules::users::router::{init_directory_router, init_profile_router};
use crate::state::AppState;

// multipart framing on top of the largest accepted file
const MULTIPART_OVERHEAD: usize = 64 * 1024;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> AppError {
    AppError::not_found(anyhow!("Route not found"))
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            message: "Method not allowed".to_string(),
        }),
    )
}

/// Turns a handler panic into a 500 with the usual error envelope.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    AppError::internal_error(format!("handler panicked: {}", detail)).into_response()
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    // credentials cannot be combined with a wildcard origin
    if config.allows_any() {
        return layer.allow_origin(AnyOrigin);
    }

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    layer.allow_origin(allowed_origins).allow_credentials(true)
}

/// `/api/users` routes, each behind its pipeline:
/// public, `authenticate`, or `authenticate` then `require_admin`.
pub fn init_users_api(state: &AppState) -> Router<AppState> {
    let authenticated = init_session_router()
        .merge(init_profile_router())
        .merge(init_directory_router().route_layer(middleware::from_fn(require_admin)))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    init_auth_router()
        .merge(authenticated)
        .layer(DefaultBodyLimit::max(
            state.upload_config.max_file_size + MULTIPART_OVERHEAD,
        ))
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest("/api/users", init_users_api(&state))
        .nest_service(
            UPLOADS_ROUTE,
            ServeDir::new(&state.upload_config.upload_dir),
        )
        // only applies to routes registered above
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .with_state(state.clone())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(logging_middleware))
}
