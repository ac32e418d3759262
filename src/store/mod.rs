//! Vector store integration
//!
//! The [`VectorStore`] trait covers everything the ingestion and query paths
//! need from the external vector database: collection listing, upsert with
//! create-on-demand, describe, scroll, similarity search, and deletion.
//! [`QdrantStore`] is the production backend; [`MemoryStore`] is a
//! brute-force in-process implementation used by tests.
//!
//! No operation spans a transaction. If embedding succeeds and the upsert
//! fails, nothing from that batch is persisted and nothing is rolled back;
//! ingestion is at-least-once and idempotent at the point level.

mod memory;
mod qdrant;

pub use memory::MemoryStore;
pub use qdrant::QdrantStore;

use crate::chunk::Chunk;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload stored beside each vector. `sourceId` is what the UI shows as
/// provenance, so the wire names are fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkPayload {
    pub text: String,
    pub source_id: String,
    pub source_type: String,
    pub position: usize,
    /// Page title, present for website sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A chunk ready for upsert: vector plus payload under a fresh point id.
#[derive(Debug, Clone)]
pub struct ChunkPoint {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub payload: ChunkPayload,
}

impl ChunkPoint {
    pub fn new(chunk: &Chunk, vector: Vec<f32>, source_id: &str, source_type: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            vector,
            payload: ChunkPayload {
                text: chunk.text.clone(),
                source_id: source_id.to_string(),
                source_type: source_type.to_string(),
                position: chunk.position,
                title: None,
            },
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.payload.title = title;
        self
    }
}

/// A point returned by scroll
#[derive(Debug, Clone, Serialize)]
pub struct StoredPoint {
    pub id: String,
    pub payload: ChunkPayload,
}

/// A similarity search hit
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub payload: ChunkPayload,
}

/// Collection metadata from describe
#[derive(Debug, Clone, Serialize)]
pub struct CollectionInfo {
    pub status: String,
    pub points_count: u64,
    pub vector_size: Option<u64>,
}

/// Storage backend for embedded chunks, keyed by collection name.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// List collection names. Order is whatever the store reports.
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Upsert points into the named collection, creating it (cosine
    /// distance) if absent. Name collisions merge silently.
    async fn create_or_append(&self, collection: &str, points: Vec<ChunkPoint>) -> Result<()>;

    /// Collection status, or None if it does not exist.
    async fn describe(&self, collection: &str) -> Result<Option<CollectionInfo>>;

    /// Up to `limit` stored points with payload; no ordering guarantee.
    async fn scroll(&self, collection: &str, limit: u32) -> Result<Vec<StoredPoint>>;

    /// The `k` nearest points to `vector` by the store's distance metric.
    async fn search(&self, collection: &str, vector: &[f32], k: usize) -> Result<Vec<SearchHit>>;

    /// Remove the collection. Returns false when it was already absent.
    async fn delete_collection(&self, collection: &str) -> Result<bool>;
}
