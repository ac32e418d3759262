//! Workflow controller
//!
//! Owns the [`AppState`] and sequences the ingestion and chat pipelines
//! against the embedder, the vector store and the chat client. Every
//! operation runs its validations through the state transitions first, so
//! invalid input is rejected before any network call.

mod state;

pub use state::*;

use crate::chat::ChatCompleter;
use crate::chunk::split_text;
use crate::config::Config;
use crate::embed::{embed_in_batches, Embedder};
use crate::error::{Error, Result};
use crate::extract::{extract_pdf_text, WebScraper};
use crate::models::{
    file_collection_name, text_collection_name, website_collection_name, Source, SourceKind,
};
use crate::retrieve::retrieve_context;
use crate::store::{ChunkPoint, VectorStore};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AppController {
    config: Config,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    chat: Arc<dyn ChatCompleter>,
    scraper: WebScraper,
    state: AppState,
}

impl AppController {
    pub fn new(
        config: Config,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        chat: Arc<dyn ChatCompleter>,
    ) -> Result<Self> {
        let scraper = WebScraper::new(config.ingest.scrape_timeout_secs)?;
        Ok(Self {
            config,
            embedder,
            store,
            chat,
            scraper,
            state: AppState::new(),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Fetch the collection list from the store and reconcile the selection.
    pub async fn refresh_collections(&mut self) -> Result<()> {
        let names = self.store.list_collections().await?;
        self.state.set_collections(names);
        Ok(())
    }

    /// Run one ingestion batch. Items are processed sequentially; a failed
    /// item is recorded in the report and never aborts its siblings. The
    /// collection list is refreshed afterwards regardless of outcome.
    pub async fn add_source(&mut self, request: IngestRequest) -> Result<IngestReport> {
        self.state
            .ingest_submitted(&request, self.config.ingest.max_links_per_batch)?;

        let mut report = IngestReport::default();

        match &request {
            IngestRequest::Files(files) => {
                for file in files {
                    let label = file.display().to_string();
                    match self.ingest_file(file).await {
                        Ok((name, chunks)) => {
                            report.succeeded.push(Source::new(name, SourceKind::File));
                            report.chunks_written += chunks;
                        }
                        Err(e) => {
                            warn!("Failed to ingest {}: {}", label, e);
                            report.failed.push((label, e.to_string()));
                        }
                    }
                }
            }
            IngestRequest::Text(text) => {
                let name = text_collection_name(text, Utc::now());
                match self
                    .ingest_document(&name, SourceKind::Text, text)
                    .await
                {
                    Ok(chunks) => {
                        report.succeeded.push(Source::new(name, SourceKind::Text));
                        report.chunks_written += chunks;
                    }
                    Err(e) => {
                        warn!("Failed to ingest pasted text: {}", e);
                        report.failed.push(("pasted text".to_string(), e.to_string()));
                    }
                }
            }
            IngestRequest::Links(links) => {
                for link in links {
                    match self.ingest_link(link).await {
                        Ok((name, chunks)) => {
                            report.succeeded.push(Source::new(name, SourceKind::Website));
                            report.chunks_written += chunks;
                        }
                        Err(e) => {
                            warn!("Failed to ingest {}: {}", link, e);
                            report.failed.push((link.clone(), e.to_string()));
                        }
                    }
                }
            }
        }

        info!(
            "Ingestion batch done: {} succeeded, {} failed, {} chunks",
            report.succeeded.len(),
            report.failed.len(),
            report.chunks_written
        );

        self.state.ingest_finished(report.clone());

        // The batch outcome stands on its own; a failed list refresh is
        // reported as a warning and retried on the next refresh.
        if let Err(e) = self.refresh_collections().await {
            warn!("Could not refresh the collection list: {}", e);
        }
        Ok(report)
    }

    async fn ingest_file(&self, path: &Path) -> Result<(String, usize)> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Validation(format!("Invalid file path: {}", path.display())))?;
        let name = file_collection_name(file_name);
        let text = extract_pdf_text(path)?;
        let chunks = self.ingest_document(&name, SourceKind::File, &text).await?;
        Ok((name, chunks))
    }

    async fn ingest_link(&self, url: &str) -> Result<(String, usize)> {
        let name = website_collection_name(url);
        let documents = self.scraper.scrape(url).await?;

        // All pages of one URL land in that URL's collection; positions
        // continue across pages.
        let mut points = Vec::new();
        for document in &documents {
            let offset = points.len();
            points.extend(self.points_for(
                &document.page_content,
                &name,
                SourceKind::Website,
                offset,
                document.title(),
            ));
        }
        if points.is_empty() {
            return Err(Error::Extract(format!("No text extracted from '{}'", url)));
        }

        let count = self.embed_and_store(&name, points).await?;
        Ok((name, count))
    }

    async fn ingest_document(
        &self,
        collection: &str,
        kind: SourceKind,
        text: &str,
    ) -> Result<usize> {
        let points = self.points_for(text, collection, kind, 0, None);
        if points.is_empty() {
            return Err(Error::Extract("No text content to ingest".to_string()));
        }
        self.embed_and_store(collection, points).await
    }

    /// Chunk `text` into unembedded points for `collection`.
    fn points_for(
        &self,
        text: &str,
        collection: &str,
        kind: SourceKind,
        position_offset: usize,
        title: Option<String>,
    ) -> Vec<PendingPoint> {
        split_text(text, &self.config.chunk)
            .into_iter()
            .map(|mut chunk| {
                chunk.position += position_offset;
                PendingPoint {
                    chunk,
                    collection: collection.to_string(),
                    kind,
                    title: title.clone(),
                }
            })
            .collect()
    }

    async fn embed_and_store(&self, collection: &str, points: Vec<PendingPoint>) -> Result<usize> {
        let texts: Vec<String> = points.iter().map(|p| p.chunk.text.clone()).collect();
        let vectors = embed_in_batches(
            self.embedder.as_ref(),
            texts,
            self.config.embedding.batch_size,
        )
        .await?;

        let chunk_points: Vec<ChunkPoint> = points
            .iter()
            .zip(vectors)
            .map(|(p, vector)| {
                ChunkPoint::new(&p.chunk, vector, &p.collection, p.kind.as_str())
                    .with_title(p.title.clone())
            })
            .collect();

        let count = chunk_points.len();
        self.store.create_or_append(collection, chunk_points).await?;
        Ok(count)
    }

    /// One chat turn: validate and append the user message, retrieve
    /// grounding context from the selected collections, ask the chat model,
    /// and append the reply. Any upstream failure returns the chat slice to
    /// Idle with the transcript holding just the user message.
    pub async fn send_message(&mut self, text: &str) -> Result<String> {
        self.state.message_submitted(text)?;

        let outcome = self.answer(text).await;
        match outcome {
            Ok(answer) => {
                self.state.response_received(&answer);
                Ok(answer)
            }
            Err(e) => {
                warn!("Chat turn failed: {}", e);
                self.state.response_failed();
                Err(e)
            }
        }
    }

    async fn answer(&self, question: &str) -> Result<String> {
        let context = retrieve_context(
            self.embedder.as_ref(),
            self.store.as_ref(),
            question,
            &self.state.selection,
            self.config.query.k,
        )
        .await?;

        let system_prompt = context.to_system_prompt();
        self.chat.complete(&system_prompt, question).await
    }

    /// Delete a collection from the store, then drop it from the list and
    /// the selection together. State is only touched after the store
    /// confirms.
    pub async fn delete_collection(&mut self, name: &str) -> Result<bool> {
        let deleted = self.store.delete_collection(name).await?;
        if deleted {
            self.state.collection_deleted(name);
        }
        Ok(deleted)
    }
}

/// A chunk waiting for its embedding.
struct PendingPoint {
    chunk: crate::chunk::Chunk,
    collection: String,
    kind: SourceKind,
    title: Option<String>,
}
