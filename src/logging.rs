use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_DIR: &str = "storage/logs";

/// Route template such as `/api/users/{id}`. Requests that matched no route
/// fall back to the raw URI path.
fn request_path(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string())
}

/// Logs one line per request and echoes the generated id in `x-request-id`.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = request_path(&req);

    let request_id = uuid::Uuid::new_v4().to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    let mut response = next.run(req).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    match status {
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Server error"
        ),
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Client error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Request completed"
        ),
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }

    response
}

/// Installs the global subscriber: a compact console layer filtered by
/// `RUST_LOG` and a daily-rolling JSON file under `storage/logs`.
pub fn init_tracing() -> anyhow::Result<()> {
    std::fs::create_dir_all(LOG_DIR)?;

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,encore_db=info,tower_http=warn,axum::rejection=trace",
            env!("CARGO_CRATE_NAME")
        ))
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let json_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "encore.json");

    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, middleware, routing::delete};
    use tower::ServiceExt;

    async fn echo_path(req: Request, next: Next) -> Response {
        let path = request_path(&req);
        let mut response = next.run(req).await;
        if let Ok(value) = HeaderValue::from_str(&path) {
            response.headers_mut().insert("x-path", value);
        }
        response
    }

    async fn path_for(uri: &str) -> String {
        let router = Router::new()
            .nest("/api/users", Router::new().route("/{id}", delete(|| async {})))
            .layer(middleware::from_fn(echo_path));

        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        response.headers()["x-path"].to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_request_path_uses_route_template() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(path_for(&format!("/api/users/{}", id)).await, "/api/users/{id}");
    }

    #[tokio::test]
    async fn test_request_path_falls_back_to_uri() {
        assert_eq!(path_for("/nowhere").await, "/nowhere");
    }
}
