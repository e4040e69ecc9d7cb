//! # Schema Server
//!
//! Control-plane HTTP service for schema directories. Directories are
//! scanned and chain-validated before being admitted, then tracked in an
//! in-memory store keyed by generated IDs.
//!
//! Endpoints:
//!
//! - `POST /schema` to scan and track a directory (or register an empty one)
//! - `GET /schema` to list all tracked schemas
//! - `GET /schema/{id}` to fetch one schema
//! - `DELETE /schema/{id}` to stop tracking (filesystem untouched)
//! - `GET /health` as a liveness probe
//!
//! Errors are returned as a typed JSON envelope; user-attributable problems
//! map to 400, everything else to 500.

mod error;
mod routes;
mod store;

pub use error::{codes, ErrorBody, ErrorType};
pub use routes::{router, AppState};
pub use store::{Schema, SchemaStore};

use anyhow::Context;

/// Configuration for a server instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerConfig {
    /// Port to listen on; 0 asks the OS for a free port.
    pub port: u16,
}

/// Start the HTTP server and block until the process is interrupted.
pub async fn start(config: ServerConfig) -> anyhow::Result<()> {
    let app = router(AppState::default());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("could not bind on port {}", config.port))?;
    let addr = listener.local_addr().context("listener has no local addr")?;
    log::info!("Starting server at {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server terminated")?;
    log::info!("Shutting down http server...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to install shutdown handler: {err}");
    }
}
