//! Request handlers for the proxy endpoints.
//!
//! Request bodies use `Option` fields so malformed input gets our 400
//! response instead of the framework's rejection.

use super::ServerState;
use crate::extract::ScrapedDocument;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "systemPrompt")]
    pub system_prompt: Option<String>,
    #[serde(rename = "userPrompt")]
    pub user_prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub documents: Vec<ScrapedDocument>,
}

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// POST /api/chat: forward a prepared prompt pair to the chat model.
pub async fn chat(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<Value>)> {
    let system_prompt = match request.system_prompt.as_deref() {
        Some(p) if !p.trim().is_empty() => p,
        _ => return Err(bad_request("systemPrompt is required")),
    };
    let user_prompt = match request.user_prompt.as_deref() {
        Some(p) if !p.trim().is_empty() => p,
        _ => return Err(bad_request("userPrompt is required")),
    };

    debug!("Forwarding chat request ({} prompt chars)", system_prompt.len());

    match state.chat.complete(system_prompt, user_prompt).await {
        Ok(text) => Ok(Json(ChatResponse { text })),
        Err(e) => {
            error!("Chat completion failed: {}", e);
            Err(internal_error("Failed to get response from OpenAI"))
        }
    }
}

/// POST /api/scrape: fetch one website and return its extracted documents.
pub async fn scrape(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, (StatusCode, Json<Value>)> {
    let url = match request.url.as_deref() {
        Some(u) if !u.trim().is_empty() => u,
        _ => return Err(bad_request("URL is required")),
    };

    debug!("Scraping {} on behalf of a client", url);

    match state.scraper.scrape(url).await {
        Ok(documents) => Ok(Json(ScrapeResponse { documents })),
        Err(e) => {
            error!("Scrape of {} failed: {}", url, e);
            Err(internal_error("Failed to scrape website"))
        }
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({"error": message})))
}

fn internal_error(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": message})),
    )
}
