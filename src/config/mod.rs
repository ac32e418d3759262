//! Configuration management for ragchat
//!
//! Settings come from an optional TOML file merged with environment
//! variables. The embedding API key and the Qdrant URL are required and
//! validated at startup so missing credentials fail with a clear message
//! instead of a confusing downstream HTTP error.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable holding the Qdrant base URL.
pub const QDRANT_URL_ENV: &str = "QDRANT_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Qdrant connection URL (required; env QDRANT_URL overrides)
    #[serde(default)]
    pub qdrant_url: String,

    /// OpenAI API key (never written back to disk or logged;
    /// env OPENAI_API_KEY overrides)
    #[serde(default, skip_serializing)]
    pub openai_api_key: String,

    /// Embedding model configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Chat completion configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunk: ChunkConfig,

    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Ingestion configuration
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Proxy server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model identifier
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding dimension (must match model)
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Batch size for embedding requests
    #[serde(default = "default_embedding_batch_size")]
    pub batch_size: usize,

    /// API base URL
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

/// Lookup the expected embedding dimension for a known model
pub fn embedding_dimension_for_model(model: &str) -> Option<usize> {
    match model {
        "text-embedding-3-large" => Some(3072),
        "text-embedding-3-small" => Some(1536),
        "text-embedding-ada-002" => Some(1536),
        _ => None,
    }
}

impl EmbeddingConfig {
    /// Resolve the effective embedding dimension based on the configured model
    pub fn resolved_dimension(&self) -> usize {
        embedding_dimension_for_model(&self.model).unwrap_or(self.dimension)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            batch_size: default_embedding_batch_size(),
            base_url: default_openai_base_url(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Chat completion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Model identifier
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            base_url: default_openai_base_url(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Chunking configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum characters per chunk
    #[serde(default = "default_chunk_max_chars")]
    pub max_chars: usize,

    /// Overlap characters between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub overlap_chars: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chars: default_chunk_max_chars(),
            overlap_chars: default_chunk_overlap(),
        }
    }
}

/// Query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Nearest neighbors fetched per collection
    #[serde(default = "default_query_k")]
    pub k: usize,

    /// Points fetched when sampling a collection's contents
    #[serde(default = "default_scroll_limit")]
    pub scroll_limit: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            k: default_query_k(),
            scroll_limit: default_scroll_limit(),
        }
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Maximum website links accepted in one batch (rejected wholesale above)
    #[serde(default = "default_max_links_per_batch")]
    pub max_links_per_batch: usize,

    /// Scrape request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub scrape_timeout_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_links_per_batch: default_max_links_per_batch(),
            scrape_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Proxy server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for `ragchat serve`
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_server_bind(),
        }
    }
}

impl Config {
    /// Default base directory (~/.config/ragchat)
    pub fn default_base_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ragchat")
    }

    /// Default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Load configuration: optional TOML file, then environment overrides,
    /// then validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = Self::default_config_path();
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    Config::default()
                }
            }
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(OPENAI_API_KEY_ENV) {
            if !key.is_empty() {
                self.openai_api_key = key;
            }
        }
        if let Ok(url) = std::env::var(QDRANT_URL_ENV) {
            if !url.is_empty() {
                self.qdrant_url = url;
            }
        }
    }

    /// Fail fast on missing credentials or unusable values.
    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.trim().is_empty() {
            return Err(Error::Config(format!(
                "No embedding API key configured. Set the {} environment variable \
                 or add `openai_api_key` to the config file.",
                OPENAI_API_KEY_ENV
            )));
        }
        if self.qdrant_url.trim().is_empty() {
            return Err(Error::Config(format!(
                "No vector store URL configured. Set the {} environment variable \
                 (e.g. http://localhost:6334) or add `qdrant_url` to the config file.",
                QDRANT_URL_ENV
            )));
        }
        url::Url::parse(&self.qdrant_url)
            .map_err(|e| Error::Config(format!("Invalid qdrant_url '{}': {}", self.qdrant_url, e)))?;
        if self.chunk.overlap_chars >= self.chunk.max_chars {
            return Err(Error::Config(format!(
                "chunk.overlap_chars ({}) must be smaller than chunk.max_chars ({})",
                self.chunk.overlap_chars, self.chunk.max_chars
            )));
        }
        Ok(())
    }

    /// Write a commented default config file, creating parent directories.
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let rendered = toml::to_string_pretty(&Config::default())
            .map_err(|e| Error::Config(format!("Cannot render default config: {}", e)))?;
        let content = format!(
            "# ragchat configuration\n\
             # The OpenAI API key is read from the {} environment variable.\n\
             # The Qdrant URL may also be set via {}.\n\n{}",
            OPENAI_API_KEY_ENV, QDRANT_URL_ENV, rendered
        );
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            qdrant_url: "http://localhost:6334".to_string(),
            openai_api_key: "sk-test".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_api_key() {
        let mut config = valid_config();
        config.openai_api_key = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(OPENAI_API_KEY_ENV));
    }

    #[test]
    fn test_validate_rejects_missing_qdrant_url() {
        let mut config = valid_config();
        config.qdrant_url = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(QDRANT_URL_ENV));
    }

    #[test]
    fn test_validate_rejects_overlap_not_smaller_than_max() {
        let mut config = valid_config();
        config.chunk.overlap_chars = config.chunk.max_chars;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolved_dimension_follows_known_model() {
        let mut embedding = EmbeddingConfig::default();
        embedding.dimension = 42;
        assert_eq!(embedding.resolved_dimension(), 3072);

        embedding.model = "custom-model".to_string();
        assert_eq!(embedding.resolved_dimension(), 42);
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = valid_config();
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("sk-test"));
    }

    #[test]
    fn test_write_default_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::write_default(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();

        assert_eq!(loaded.embedding.model, "text-embedding-3-large");
        assert_eq!(loaded.chat.model, "gpt-4o-mini");
        assert_eq!(loaded.server.bind, "127.0.0.1:5000");
        // The key never round-trips through the file.
        assert!(loaded.openai_api_key.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            qdrant_url = "http://localhost:6334"

            [chunk]
            max_chars = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.chunk.max_chars, 500);
        assert_eq!(config.chunk.overlap_chars, 200);
        assert_eq!(config.embedding.model, "text-embedding-3-large");
        assert_eq!(config.query.k, 5);
    }
}
