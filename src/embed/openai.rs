//! OpenAI embeddings backend

use super::Embedder;
use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

pub struct OpenAiEmbedder {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedder {
    pub fn new(config: &EmbeddingConfig, api_key: &str) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("Invalid embedding base URL: {}", e)))?;
        let endpoint = join_endpoint(&base, "embeddings")?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            dimension: config.resolved_dimension(),
        })
    }

    fn validate_dimensions(&self, embeddings: &[Vec<f32>]) -> Result<()> {
        if let Some(mismatch) = embeddings.iter().find(|vec| vec.len() != self.dimension) {
            return Err(Error::Embedding(format!(
                "Embedding dimension mismatch for model '{}': expected {}, got {}",
                self.model,
                self.dimension,
                mismatch.len()
            )));
        }
        Ok(())
    }
}

fn join_endpoint(base: &Url, path: &str) -> Result<Url> {
    // Url::join treats "v1" and "v1/" differently; keep the base's full path.
    let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), path);
    Url::parse(&joined).map_err(|e| Error::Config(format!("Invalid endpoint URL: {}", e)))
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "Embedding API returned {}: {}",
                status,
                body.chars().take(300).collect::<String>()
            )));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("Invalid embedding response: {}", e)))?;

        // The API documents input order, but the index field is authoritative.
        parsed.data.sort_by_key(|d| d.index);
        let embeddings: Vec<Vec<f32>> = parsed.data.into_iter().map(|d| d.embedding).collect();

        self.validate_dimensions(&embeddings)?;
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server_uri: &str, dimension: usize) -> EmbeddingConfig {
        EmbeddingConfig {
            model: "test-embed".to_string(),
            dimension,
            batch_size: 32,
            base_url: server_uri.to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_embed_sends_model_and_key_and_decodes_vectors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(bearer_token("sk-test"))
            .and(body_partial_json(json!({"model": "test-embed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"index": 1, "embedding": [0.3, 0.4]},
                    {"index": 0, "embedding": [0.1, 0.2]}
                ]
            })))
            .mount(&server)
            .await;

        let embedder = OpenAiEmbedder::new(&test_config(&server.uri(), 2), "sk-test").unwrap();
        let vectors = embedder
            .embed(vec!["first".to_string(), "second".to_string()])
            .await
            .unwrap();

        // Out-of-order response entries are re-sorted by index.
        assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
    }

    #[tokio::test]
    async fn test_upstream_error_propagates_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .expect(1)
            .mount(&server)
            .await;

        let embedder = OpenAiEmbedder::new(&test_config(&server.uri(), 2), "sk-test").unwrap();
        let err = embedder.embed(vec!["text".to_string()]).await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_dimension_mismatch_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"index": 0, "embedding": [0.1, 0.2, 0.3]}]
            })))
            .mount(&server)
            .await;

        let embedder = OpenAiEmbedder::new(&test_config(&server.uri(), 2), "sk-test").unwrap();
        let err = embedder.embed(vec!["text".to_string()]).await.unwrap_err();
        assert!(err.to_string().contains("dimension mismatch"));
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_request() {
        let embedder =
            OpenAiEmbedder::new(&test_config("http://127.0.0.1:1", 2), "sk-test").unwrap();
        let vectors = embedder.embed(Vec::new()).await.unwrap();
        assert!(vectors.is_empty());
    }
}
