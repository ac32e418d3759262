//! Qdrant vector database backend

use super::{ChunkPayload, ChunkPoint, CollectionInfo, SearchHit, StoredPoint, VectorStore};
use crate::error::{Error, Result};
use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, GetCollectionInfoResponse, PointId, PointStruct,
    ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::Value;
use tracing::{debug, info};

/// Qdrant-backed [`VectorStore`]. One instance serves every collection.
pub struct QdrantStore {
    client: Qdrant,
    dimension: usize,
}

impl QdrantStore {
    /// Connect to Qdrant; `dimension` is enforced on every upsert and used
    /// when creating collections.
    pub fn new(url: &str, dimension: usize) -> Result<Self> {
        debug!("Connecting to Qdrant at {}", url);

        let client = Qdrant::from_url(url)
            .skip_compatibility_check()
            .build()
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(Self { client, dimension })
    }

    async fn ensure_collection(&self, collection: &str) -> Result<()> {
        if self.client.collection_exists(collection).await? {
            return Ok(());
        }

        info!(
            "Creating collection {} with dimension {}",
            collection, self.dimension
        );

        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection).vectors_config(
                    VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                ),
            )
            .await?;

        Ok(())
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let response = self.client.list_collections().await?;
        Ok(response
            .collections
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    async fn create_or_append(&self, collection: &str, points: Vec<ChunkPoint>) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        if let Some(mismatch) = points.iter().find(|p| p.vector.len() != self.dimension) {
            return Err(Error::VectorStore(format!(
                "Vector dimension mismatch for collection '{}': expected {}, got {}",
                collection,
                self.dimension,
                mismatch.vector.len()
            )));
        }

        self.ensure_collection(collection).await?;

        debug!("Upserting {} points to collection {}", points.len(), collection);

        let point_structs = points
            .into_iter()
            .map(|p| {
                let payload = Payload::try_from(serde_json::to_value(&p.payload)?)
                    .map_err(|e| Error::VectorStore(format!("Invalid payload: {}", e)))?;
                Ok(PointStruct::new(p.id.to_string(), p.vector, payload))
            })
            .collect::<Result<Vec<_>>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, point_structs))
            .await?;

        Ok(())
    }

    async fn describe(&self, collection: &str) -> Result<Option<CollectionInfo>> {
        if !self.client.collection_exists(collection).await? {
            return Ok(None);
        }

        let info = self.client.collection_info(collection).await?;
        let vector_size = vector_size_from_info(&info);

        Ok(info.result.map(|result| CollectionInfo {
            status: format!("{:?}", result.status()),
            points_count: result.points_count.unwrap_or(0),
            vector_size,
        }))
    }

    async fn scroll(&self, collection: &str, limit: u32) -> Result<Vec<StoredPoint>> {
        let response = self
            .client
            .scroll(
                ScrollPointsBuilder::new(collection)
                    .limit(limit)
                    .with_payload(true)
                    .with_vectors(false),
            )
            .await?;

        response
            .result
            .into_iter()
            .map(|point| {
                let payload = payload_from_qdrant(point.payload)?;
                Ok(StoredPoint {
                    id: point.id.map(point_id_to_string).unwrap_or_default(),
                    payload,
                })
            })
            .collect()
    }

    async fn search(&self, collection: &str, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        debug!("Searching collection {} with k {}", collection, k);

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, vector.to_vec(), k as u64)
                    .with_payload(true),
            )
            .await?;

        response
            .result
            .into_iter()
            .map(|point| {
                let payload = payload_from_qdrant(point.payload)?;
                Ok(SearchHit {
                    id: point.id.map(point_id_to_string).unwrap_or_default(),
                    score: point.score,
                    payload,
                })
            })
            .collect()
    }

    async fn delete_collection(&self, collection: &str) -> Result<bool> {
        if !self.client.collection_exists(collection).await? {
            return Ok(false);
        }

        info!("Deleting collection {}", collection);
        self.client.delete_collection(collection).await?;
        Ok(true)
    }
}

fn payload_from_qdrant(
    payload: std::collections::HashMap<String, qdrant_client::qdrant::Value>,
) -> Result<ChunkPayload> {
    let map: serde_json::Map<String, Value> = payload
        .into_iter()
        .map(|(k, v)| (k, json_from_qdrant_value(v)))
        .collect();
    serde_json::from_value(Value::Object(map))
        .map_err(|e| Error::VectorStore(format!("Unreadable point payload: {}", e)))
}

fn vector_size_from_info(info: &GetCollectionInfoResponse) -> Option<u64> {
    use qdrant_client::qdrant::vectors_config::Config;

    let params = info
        .result
        .as_ref()?
        .config
        .as_ref()?
        .params
        .as_ref()?
        .vectors_config
        .as_ref()?
        .config
        .as_ref()?;

    match params {
        Config::Params(p) => Some(p.size),
        Config::ParamsMap(map) => map.map.values().next().map(|p| p.size),
    }
}

fn point_id_to_string(id: PointId) -> String {
    use qdrant_client::qdrant::point_id::PointIdOptions;

    match id.point_id_options {
        Some(PointIdOptions::Uuid(uuid)) => uuid,
        Some(PointIdOptions::Num(num)) => num.to_string(),
        None => String::new(),
    }
}

fn json_from_qdrant_value(v: qdrant_client::qdrant::Value) -> Value {
    use qdrant_client::qdrant::value::Kind;

    match v.kind {
        Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::IntegerValue(i)) => Value::Number(i.into()),
        Some(Kind::DoubleValue(d)) => serde_json::Number::from_f64(d)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::ListValue(list)) => Value::Array(
            list.values
                .into_iter()
                .map(json_from_qdrant_value)
                .collect(),
        ),
        Some(Kind::StructValue(s)) => Value::Object(
            s.fields
                .into_iter()
                .map(|(k, v)| (k, json_from_qdrant_value(v)))
                .collect(),
        ),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;

    #[tokio::test]
    async fn test_upsert_rejects_dimension_mismatch_before_any_call() {
        let store = QdrantStore::new("http://127.0.0.1:6334", 3).unwrap();

        let chunk = Chunk {
            text: "payload text".to_string(),
            position: 0,
            overlap: 0,
        };
        let point = ChunkPoint::new(&chunk, vec![0.1, 0.2], "src", "text");

        let err = store
            .create_or_append("anything", vec![point])
            .await
            .expect_err("mismatched vector length must be rejected");

        match err {
            Error::VectorStore(message) => {
                assert!(message.contains("dimension mismatch"))
            }
            other => panic!("expected vector store error, got {other:?}"),
        }
    }

    #[test]
    fn test_payload_round_trips_through_json() {
        let payload = ChunkPayload {
            text: "chunk body".to_string(),
            source_id: "notes.pdf".to_string(),
            source_type: "file".to_string(),
            position: 3,
            title: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["sourceId"], "notes.pdf");
        assert_eq!(value["sourceType"], "file");
        // An absent title never lands in the stored payload.
        assert!(value.get("title").is_none());

        let back: ChunkPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back, payload);
    }
}
