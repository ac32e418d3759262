//! Application state and transitions
//!
//! All user-visible state lives in one serializable [`AppState`] value.
//! The ingestion and chat workflows each own an independent state-machine
//! slice, so a slow ingestion never blocks the chat loop's indicators and
//! vice versa. Transitions are explicit methods; validation happens before
//! any slice leaves Idle, so rejected input never triggers a network call.

use crate::error::{Error, Result};
use crate::models::{ChatMessage, Source};
use serde::Serialize;
use std::path::PathBuf;

/// Ingestion workflow phase. Terminal outcomes return to Idle and are
/// recorded in the slice's report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum IngestPhase {
    #[default]
    Idle,
    Submitting,
}

/// Chat workflow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ChatPhase {
    #[default]
    Idle,
    AwaitingResponse,
}

/// What the user submitted in an ingestion modal
#[derive(Debug, Clone)]
pub enum IngestRequest {
    /// PDF files to upload
    Files(Vec<PathBuf>),
    /// Pasted raw text
    Text(String),
    /// Website links, one collection per link
    Links(Vec<String>),
}

/// Outcome summary of one ingestion batch. A failed item never aborts its
/// siblings; failures are collected here instead.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    /// Sources created or appended to, one per collection
    pub succeeded: Vec<Source>,
    /// (item label, error message) per failed item
    pub failed: Vec<(String, String)>,
    /// Total chunks written across the batch
    pub chunks_written: usize,
}

impl IngestReport {
    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestSlice {
    pub phase: IngestPhase,
    /// Report of the most recent batch
    pub last_report: Option<IngestReport>,
    /// Set when a terminal transition requests a collection-list refresh
    pub needs_refresh: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatSlice {
    pub phase: ChatPhase,
    /// Append-only transcript, transient (never persisted)
    pub transcript: Vec<ChatMessage>,
}

/// The whole application state
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppState {
    pub ingest: IngestSlice,
    pub chat: ChatSlice,
    /// Collection names as last fetched from the store
    pub collections: Vec<String>,
    /// Collections opted into for the next query, in selection order
    pub selection: Vec<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    // --- ingestion transitions ---

    /// Validate a submitted batch and enter Submitting.
    pub fn ingest_submitted(&mut self, request: &IngestRequest, max_links: usize) -> Result<()> {
        if self.ingest.phase != IngestPhase::Idle {
            return Err(Error::Validation(
                "An ingestion is already in progress".to_string(),
            ));
        }

        match request {
            IngestRequest::Files(files) if files.is_empty() => {
                return Err(Error::Validation("Please select a file".to_string()));
            }
            IngestRequest::Text(text) if text.trim().is_empty() => {
                return Err(Error::Validation("Please enter some text".to_string()));
            }
            IngestRequest::Links(links) if links.is_empty() => {
                return Err(Error::Validation("Please enter a website link".to_string()));
            }
            IngestRequest::Links(links) if links.len() > max_links => {
                // Rejected wholesale, never truncated.
                return Err(Error::Validation(format!(
                    "At most {} links per batch ({} submitted)",
                    max_links,
                    links.len()
                )));
            }
            _ => {}
        }

        self.ingest.phase = IngestPhase::Submitting;
        Ok(())
    }

    /// Record the batch outcome and return to Idle. Clearing the submitted
    /// inputs is the caller's concern; the refresh request is ours.
    pub fn ingest_finished(&mut self, report: IngestReport) {
        self.ingest.phase = IngestPhase::Idle;
        self.ingest.last_report = Some(report);
        self.ingest.needs_refresh = true;
    }

    // --- chat transitions ---

    /// Validate and optimistically append the user message, then wait for
    /// the response. The message is visible in the transcript before any
    /// network round trip completes.
    pub fn message_submitted(&mut self, text: &str) -> Result<()> {
        if self.chat.phase != ChatPhase::Idle {
            return Err(Error::Validation(
                "Still waiting for the previous response".to_string(),
            ));
        }
        if text.trim().is_empty() {
            return Err(Error::Validation("Please enter a message".to_string()));
        }
        if self.selection.is_empty() {
            return Err(Error::Validation(
                "Please select at least one collection".to_string(),
            ));
        }

        self.chat.transcript.push(ChatMessage::user(text));
        self.chat.phase = ChatPhase::AwaitingResponse;
        Ok(())
    }

    /// Append the bot reply and return to Idle.
    pub fn response_received(&mut self, text: &str) {
        self.chat.transcript.push(ChatMessage::bot(text));
        self.chat.phase = ChatPhase::Idle;
    }

    /// Return to Idle leaving the transcript with just the user message;
    /// the error itself is reported out of band.
    pub fn response_failed(&mut self) {
        self.chat.phase = ChatPhase::Idle;
    }

    // --- collection list & selection ---

    /// Replace the collection list. Newly appearing collections are
    /// auto-selected; selections pointing at vanished collections are
    /// dropped.
    pub fn set_collections(&mut self, names: Vec<String>) {
        self.selection.retain(|s| names.contains(s));
        for name in &names {
            if !self.selection.contains(name) && !self.collections.contains(name) {
                self.selection.push(name.clone());
            }
        }
        self.collections = names;
        self.ingest.needs_refresh = false;
    }

    pub fn toggle_selection(&mut self, name: &str) {
        if let Some(pos) = self.selection.iter().position(|s| s == name) {
            self.selection.remove(pos);
        } else if self.collections.iter().any(|c| c == name) {
            self.selection.push(name.to_string());
        }
    }

    pub fn select_all(&mut self) {
        self.selection = self.collections.clone();
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// Remove a deleted collection from the list and the selection in the
    /// same mutation, so no stale selection can reference it.
    pub fn collection_deleted(&mut self, name: &str) {
        self.collections.retain(|c| c != name);
        self.selection.retain(|s| s != name);
    }
}
