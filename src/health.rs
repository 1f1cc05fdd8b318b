//! Liveness endpoint for the hosting platform's health check.
//!
//! `GET /` answers 200 with a constant body for as long as the process is up.
//! It shares nothing with the Discord client.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

pub const LIVENESS_BODY: &str = "Bot is running!";

async fn home() -> &'static str {
    LIVENESS_BODY
}

pub fn router() -> Router {
    Router::new().route("/", get(home))
}

/// Bind on all interfaces. A taken port is fatal for the caller.
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Liveness server listening on {}", addr);
    Ok(listener)
}

/// Serve until the process exits.
pub async fn serve(listener: TcpListener) -> Result<()> {
    axum::serve(listener, router())
        .await
        .context("Liveness server error")
}
