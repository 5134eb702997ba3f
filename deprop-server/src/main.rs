//! Binary entrypoint for the deprop HTTP server.
//!
//! Reads configuration from environment variables:
//! - `DEPROP_BIND`: Interface to bind (default: "0.0.0.0")
//! - `DEPROP_PORT`: Server listen port (default: "8080")

use anyhow::{Context, Result};

use deprop_core::{init_logging, LogFormat};
use deprop_server::router::build_router;
use deprop_server::settings::ServerSettings;
use deprop_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(LogFormat::Pretty);

    let settings = ServerSettings::from_env()?;
    let app = build_router(AppState::new());

    let addr = settings.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("deprop server starting on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("deprop server stopped");
    Ok(())
}

/// Resolves on Ctrl-C; in-flight runs finish before the server exits.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C; shutting down");
    }
    tracing::info!("shutdown requested");
}
