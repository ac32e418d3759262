//! In-memory [`VectorStore`] used by tests.
//!
//! Collections live in a `Vec` so listing preserves creation order; search
//! is brute-force cosine similarity.

use super::{ChunkPoint, CollectionInfo, SearchHit, StoredPoint, VectorStore};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::RwLock;

struct MemoryCollection {
    name: String,
    points: Vec<ChunkPoint>,
}

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Vec<MemoryCollection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let collections = self.collections.read().unwrap();
        Ok(collections.iter().map(|c| c.name.clone()).collect())
    }

    async fn create_or_append(&self, collection: &str, points: Vec<ChunkPoint>) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        match collections.iter_mut().find(|c| c.name == collection) {
            Some(existing) => existing.points.extend(points),
            None => collections.push(MemoryCollection {
                name: collection.to_string(),
                points,
            }),
        }
        Ok(())
    }

    async fn describe(&self, collection: &str) -> Result<Option<CollectionInfo>> {
        let collections = self.collections.read().unwrap();
        Ok(collections
            .iter()
            .find(|c| c.name == collection)
            .map(|c| CollectionInfo {
                status: "Green".to_string(),
                points_count: c.points.len() as u64,
                vector_size: c.points.first().map(|p| p.vector.len() as u64),
            }))
    }

    async fn scroll(&self, collection: &str, limit: u32) -> Result<Vec<StoredPoint>> {
        let collections = self.collections.read().unwrap();
        let found = collections
            .iter()
            .find(|c| c.name == collection)
            .ok_or_else(|| Error::VectorStore(format!("Collection '{}' not found", collection)))?;
        Ok(found
            .points
            .iter()
            .take(limit as usize)
            .map(|p| StoredPoint {
                id: p.id.to_string(),
                payload: p.payload.clone(),
            })
            .collect())
    }

    async fn search(&self, collection: &str, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        let collections = self.collections.read().unwrap();
        let found = collections
            .iter()
            .find(|c| c.name == collection)
            .ok_or_else(|| Error::VectorStore(format!("Collection '{}' not found", collection)))?;

        let mut hits: Vec<SearchHit> = found
            .points
            .iter()
            .map(|p| SearchHit {
                id: p.id.to_string(),
                score: cosine_similarity(vector, &p.vector),
                payload: p.payload.clone(),
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }

    async fn delete_collection(&self, collection: &str) -> Result<bool> {
        let mut collections = self.collections.write().unwrap();
        let before = collections.len();
        collections.retain(|c| c.name != collection);
        Ok(collections.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;

    fn point(text: &str, vector: Vec<f32>) -> ChunkPoint {
        let chunk = Chunk {
            text: text.to_string(),
            position: 0,
            overlap: 0,
        };
        ChunkPoint::new(&chunk, vector, "src", "text")
    }

    #[tokio::test]
    async fn test_create_append_list_delete() {
        let store = MemoryStore::new();
        store
            .create_or_append("alpha", vec![point("a", vec![1.0, 0.0])])
            .await
            .unwrap();
        store
            .create_or_append("beta", vec![point("b", vec![0.0, 1.0])])
            .await
            .unwrap();
        store
            .create_or_append("alpha", vec![point("a2", vec![1.0, 1.0])])
            .await
            .unwrap();

        assert_eq!(store.list_collections().await.unwrap(), vec!["alpha", "beta"]);
        assert_eq!(store.describe("alpha").await.unwrap().unwrap().points_count, 2);
        assert!(store.describe("missing").await.unwrap().is_none());

        assert!(store.delete_collection("alpha").await.unwrap());
        assert!(!store.delete_collection("alpha").await.unwrap());
        assert_eq!(store.list_collections().await.unwrap(), vec!["beta"]);
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity_and_truncates() {
        let store = MemoryStore::new();
        store
            .create_or_append(
                "c",
                vec![
                    point("far", vec![0.0, 1.0]),
                    point("near", vec![1.0, 0.1]),
                    point("exact", vec![1.0, 0.0]),
                ],
            )
            .await
            .unwrap();

        let hits = store.search("c", &[1.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].payload.text, "exact");
        assert_eq!(hits[1].payload.text, "near");
    }
}
