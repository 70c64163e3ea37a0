use anyhow::Context;
use dotenvy::dotenv;

use encore::logging::init_tracing;
use encore::{init_app_state, init_router};
use encore_config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let state = init_app_state().await?;
    tokio::fs::create_dir_all(&state.upload_config.upload_dir)
        .await
        .context("Failed to create upload directory")?;

    let app = init_router(state);

    let server_config = ServerConfig::from_env();
    let addr = server_config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server running on http://{}", addr);
    tracing::info!("Scalar UI available at http://{}/scalar", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
