//! Ganshift Web - minimal upload shell for the translation demo.
//!
//! One page with two file inputs, one multipart endpoint returning the
//! translated image as PNG, and a health probe. Inference runs on a
//! dedicated worker thread fed through a bounded channel, keeping the
//! blocking forward pass off the async runtime.

pub mod handlers;
pub mod state;
pub mod worker;

pub use state::{AppState, SharedState, TranslateJob};
pub use worker::spawn_worker;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

/// Upload size cap per request (two images plus multipart framing).
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Builds the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/translate", post(handlers::translate))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Binds `addr` and serves the shell until the process stops.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: &str, state: SharedState) -> anyhow::Result<()> {
    use anyhow::Context;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");
    axum::serve(listener, router(state))
        .await
        .context("Server error")
}
