//! Website scraping
//!
//! Fetches a single page per submitted URL and reduces it to plain text.
//! A failed URL yields an error for that URL only; batch isolation is the
//! caller's job.

use super::html_to_text;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// One scraped document, shaped like the `/api/scrape` wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedDocument {
    #[serde(rename = "pageContent")]
    pub page_content: String,
    pub metadata: serde_json::Value,
}

impl ScrapedDocument {
    /// Page title from the metadata, when one was found.
    pub fn title(&self) -> Option<String> {
        self.metadata
            .get("title")
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

pub struct WebScraper {
    client: Client,
}

impl WebScraper {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch one URL and return its extracted documents (one per page).
    pub async fn scrape(&self, url: &str) -> Result<Vec<ScrapedDocument>> {
        let parsed = Url::parse(url).map_err(|e| {
            Error::Scrape(format!("Invalid URL '{}': {}", url, e))
        })?;

        debug!("Scraping {}", parsed);

        let response = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| Error::Scrape(format!("Failed to fetch '{}': {}", url, e)))?
            .error_for_status()
            .map_err(|e| Error::Scrape(format!("Failed to fetch '{}': {}", url, e)))?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::Scrape(format!("Failed to read '{}': {}", url, e)))?;

        let (text, title) = html_to_text(&body);
        if text.is_empty() {
            return Err(Error::Scrape(format!("No text content at '{}'", url)));
        }

        Ok(vec![ScrapedDocument {
            page_content: text,
            metadata: json!({
                "source": parsed.to_string(),
                "title": title,
            }),
        }])
    }
}
