//! Proxy server command

use crate::chat::OpenAiChatClient;
use crate::config::Config;
use crate::error::Result;
use crate::extract::WebScraper;
use crate::server::{run, ServerState};
use std::sync::Arc;

/// Start the HTTP proxy server and block until shutdown.
pub async fn cmd_serve(config: &Config) -> Result<()> {
    let chat = OpenAiChatClient::new(&config.chat, &config.openai_api_key)?;
    let scraper = WebScraper::new(config.ingest.scrape_timeout_secs)?;

    let state = Arc::new(ServerState {
        chat: Arc::new(chat),
        scraper,
    });

    run(&config.server.bind, state).await
}
