//! Source listing, inspection and removal

use crate::error::{Error, Result};
use crate::store::VectorStore;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

/// One row of `sources list`
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub name: String,
    pub points_count: u64,
    pub status: String,
}

/// Detailed view of one collection
#[derive(Debug, Clone, Serialize)]
pub struct SourceDetail {
    pub name: String,
    pub points_count: u64,
    pub vector_size: Option<u64>,
    pub status: String,
    /// Distinct source identifiers found in the sampled points
    pub source_ids: Vec<String>,
    /// A few chunk previews
    pub samples: Vec<String>,
}

/// List every collection with its point count.
pub async fn cmd_list_sources(store: &dyn VectorStore) -> Result<Vec<SourceSummary>> {
    let names = store.list_collections().await?;
    let mut summaries = Vec::with_capacity(names.len());

    for name in names {
        let info = store.describe(&name).await?;
        let (points_count, status) = match info {
            Some(info) => (info.points_count, info.status),
            None => (0, "Unknown".to_string()),
        };
        summaries.push(SourceSummary {
            name,
            points_count,
            status,
        });
    }

    Ok(summaries)
}

/// Inspect one collection: metadata plus a sample of its stored chunks.
pub async fn cmd_show_source(
    store: &dyn VectorStore,
    name: &str,
    scroll_limit: u32,
) -> Result<SourceDetail> {
    let info = store
        .describe(name)
        .await?
        .ok_or_else(|| Error::VectorStore(format!("Collection '{}' not found", name)))?;

    let points = store.scroll(name, scroll_limit).await?;

    let source_ids: Vec<String> = points
        .iter()
        .map(|p| p.payload.source_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let samples: Vec<String> = points
        .iter()
        .take(3)
        .map(|p| preview(&p.payload.text, 120))
        .collect();

    Ok(SourceDetail {
        name: name.to_string(),
        points_count: info.points_count,
        vector_size: info.vector_size,
        status: info.status,
        source_ids,
        samples,
    })
}

/// Delete one collection. Returns false when it did not exist.
pub async fn cmd_delete_source(store: &dyn VectorStore, name: &str) -> Result<bool> {
    let deleted = store.delete_collection(name).await?;
    if deleted {
        info!("Deleted collection {}", name);
    }
    Ok(deleted)
}

fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

/// Print the source list to console.
pub fn print_sources(sources: &[SourceSummary]) {
    if sources.is_empty() {
        println!("No sources ingested yet.");
        return;
    }

    println!("{:<40} {:>10}  {}", "NAME", "POINTS", "STATUS");
    for source in sources {
        println!(
            "{:<40} {:>10}  {}",
            source.name, source.points_count, source.status
        );
    }
}

/// Print one source's detail view to console.
pub fn print_source_detail(detail: &SourceDetail) {
    println!("Collection: {}", detail.name);
    println!("  Status:      {}", detail.status);
    println!("  Points:      {}", detail.points_count);
    if let Some(size) = detail.vector_size {
        println!("  Vector size: {}", size);
    }
    if !detail.source_ids.is_empty() {
        println!("  Sources:     {}", detail.source_ids.join(", "));
    }
    if !detail.samples.is_empty() {
        println!("  Samples:");
        for sample in &detail.samples {
            println!("    - {}", sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use crate::store::{ChunkPoint, MemoryStore};

    fn point(text: &str, source: &str, position: usize) -> ChunkPoint {
        let chunk = Chunk {
            text: text.to_string(),
            position,
            overlap: 0,
        };
        ChunkPoint::new(&chunk, vec![1.0, 0.0], source, "text")
    }

    #[tokio::test]
    async fn test_list_sources_reports_point_counts() {
        let store = MemoryStore::new();
        store
            .create_or_append("alpha", vec![point("a", "alpha", 0), point("b", "alpha", 1)])
            .await
            .unwrap();
        store
            .create_or_append("beta", vec![point("c", "beta", 0)])
            .await
            .unwrap();

        let sources = cmd_list_sources(&store).await.unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "alpha");
        assert_eq!(sources[0].points_count, 2);
        assert_eq!(sources[1].points_count, 1);
    }

    #[tokio::test]
    async fn test_show_source_collects_distinct_source_ids() {
        let store = MemoryStore::new();
        store
            .create_or_append(
                "mixed",
                vec![
                    point("one", "origin-a", 0),
                    point("two", "origin-a", 1),
                    point("three", "origin-b", 2),
                ],
            )
            .await
            .unwrap();

        let detail = cmd_show_source(&store, "mixed", 100).await.unwrap();
        assert_eq!(detail.points_count, 3);
        assert_eq!(detail.source_ids, vec!["origin-a", "origin-b"]);
        assert_eq!(detail.samples.len(), 3);
    }

    #[tokio::test]
    async fn test_show_missing_source_is_an_error() {
        let store = MemoryStore::new();
        let err = cmd_show_source(&store, "nope", 10).await.unwrap_err();
        assert!(matches!(err, Error::VectorStore(_)));
    }

    #[tokio::test]
    async fn test_delete_source_reports_absence() {
        let store = MemoryStore::new();
        store
            .create_or_append("gone", vec![point("x", "gone", 0)])
            .await
            .unwrap();

        assert!(cmd_delete_source(&store, "gone").await.unwrap());
        assert!(!cmd_delete_source(&store, "gone").await.unwrap());
    }
}
