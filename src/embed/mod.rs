//! Embedding generation
//!
//! This module provides an abstraction over embedding providers with:
//! - A trait for different embedding backends
//! - The OpenAI HTTP backend
//! - Batch processing for efficiency

mod openai;

pub use openai::*;

use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for embedding providers
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input in input order
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimension
    fn dimension(&self) -> usize;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Create an embedder from configuration
pub fn create_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    let embedder = OpenAiEmbedder::new(&config.embedding, &config.openai_api_key)?;
    Ok(Arc::new(embedder))
}

/// Embed texts in batches sized by config, preserving input order.
pub async fn embed_in_batches(
    embedder: &dyn Embedder,
    texts: Vec<String>,
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut all_embeddings = Vec::with_capacity(texts.len());

    for batch in texts.chunks(batch_size.max(1)) {
        let embeddings = embedder.embed(batch.to_vec()).await?;
        all_embeddings.extend(embeddings);
    }

    Ok(all_embeddings)
}
