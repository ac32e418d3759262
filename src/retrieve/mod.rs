//! Retrieval orchestration
//!
//! For one user question: embed the question exactly once, fan similarity
//! searches out across every selected collection, join the results, and
//! build the grounding context for the chat prompt.
//!
//! Results are merged in selection order with each collection's own result
//! order preserved. Scores are NOT normalized or re-ranked across
//! collections, so a collection full of loosely-related matches can dilute
//! a more relevant collection's top hits. That simplification is
//! deliberate and kept.

use crate::embed::Embedder;
use crate::error::{Error, Result};
use crate::store::{SearchHit, VectorStore};
use serde_json::json;
use tracing::debug;

const SYSTEM_PROMPT_HEADER: &str = "You are a helpful assistant. \
Use the following context to answer the user's question. \
Only answer based on the available context.";

/// One merged retrieval hit, tagged with the collection it came from.
#[derive(Debug, Clone)]
pub struct ContextEntry {
    pub collection: String,
    pub hit: SearchHit,
}

/// The grounding context for one chat turn.
#[derive(Debug, Clone)]
pub struct GroundingContext {
    pub entries: Vec<ContextEntry>,
}

impl GroundingContext {
    /// Serialize the retrieved documents into the system prompt.
    pub fn to_system_prompt(&self) -> String {
        let documents: Vec<serde_json::Value> = self
            .entries
            .iter()
            .map(|entry| {
                json!({
                    "pageContent": entry.hit.payload.text,
                    "metadata": {
                        "sourceId": entry.hit.payload.source_id,
                        "sourceType": entry.hit.payload.source_type,
                        "position": entry.hit.payload.position,
                        "title": entry.hit.payload.title,
                        "collection": entry.collection,
                        "score": entry.hit.score,
                    }
                })
            })
            .collect();

        format!(
            "{}\n\nContext: {}",
            SYSTEM_PROMPT_HEADER,
            serde_json::Value::Array(documents)
        )
    }
}

/// Embed `question` once and search each selected collection with the same
/// vector, `k` nearest hits per collection. All searches run concurrently
/// and all must complete before the merged context is returned.
pub async fn retrieve_context(
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
    question: &str,
    selection: &[String],
    k: usize,
) -> Result<GroundingContext> {
    if selection.is_empty() {
        return Err(Error::Validation(
            "Select at least one collection before asking a question".to_string(),
        ));
    }

    let mut vectors = embedder.embed(vec![question.to_string()]).await?;
    let query_vector = vectors
        .pop()
        .ok_or_else(|| Error::Embedding("No embedding returned for query".to_string()))?;

    let searches = selection
        .iter()
        .map(|collection| store.search(collection, &query_vector, k));
    let per_collection = futures::future::try_join_all(searches).await?;

    let entries: Vec<ContextEntry> = selection
        .iter()
        .zip(per_collection)
        .flat_map(|(collection, hits)| {
            hits.into_iter().map(move |hit| ContextEntry {
                collection: collection.clone(),
                hit,
            })
        })
        .collect();

    debug!(
        "Retrieved {} context entries from {} collections",
        entries.len(),
        selection.len()
    );

    Ok(GroundingContext { entries })
}
