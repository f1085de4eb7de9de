//! Web front end for the SNR heuristic.
//!
//! All state lives in an [`AppContext`] built at startup and handed to the
//! router; handlers never touch process-wide globals.

pub mod config;
pub mod error;
pub mod handlers;
pub mod render;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tracing::info;

pub use config::{
    AppContext, DEFAULT_LISTEN_ADDR, DEFAULT_MAX_UPLOAD_BYTES, SESSION_COOKIE, WebConfig,
};
pub use error::{Result, WebError};
pub use render::{MessageKind, StatusMessage, escape_html};

/// Build the axum [`Router`] with all routes.
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let upload_limit = ctx.config.max_upload_bytes;
    Router::new()
        .route("/", get(handlers::index))
        .route("/home", get(handlers::home))
        .route("/login", get(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/single", post(handlers::single))
        .route("/upload", post(handlers::upload))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(ctx)
}

/// Bind the configured address and serve until the process stops.
pub async fn serve(config: WebConfig) -> Result<()> {
    let ctx = Arc::new(AppContext::new(config)?);
    let addr = ctx.config.listen_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| WebError::Bind { addr, source })?;
    info!(%addr, "web server listening");
    axum::serve(listener, build_router(ctx))
        .await
        .map_err(WebError::Serve)
}
