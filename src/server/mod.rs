//! HTTP proxy server
//!
//! A thin backend that keeps the API key off the client: `/api/chat`
//! forwards a prepared system+user prompt pair to the chat-completion API
//! and `/api/scrape` fetches a website and returns its extracted text.
//! Neither endpoint holds state between requests.

mod handlers;

pub use handlers::*;

use crate::chat::ChatCompleter;
use crate::error::Result;
use crate::extract::WebScraper;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state handed to every handler.
pub struct ServerState {
    pub chat: Arc<dyn ChatCompleter>,
    pub scraper: WebScraper,
}

/// Build the application router.
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/chat", post(handlers::chat))
        .route("/api/scrape", post(handlers::scrape))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run(bind: &str, state: Arc<ServerState>) -> Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on {}", bind);
    axum::serve(listener, router).await?;
    Ok(())
}
