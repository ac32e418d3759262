//! Error types for ragchat

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or validation failure
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected user input; the message is shown verbatim
    #[error("{0}")]
    Validation(String),

    /// Embedding API failure
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector store failure
    #[error("Vector store error: {0}")]
    VectorStore(String),

    /// Chat completion API failure
    #[error("Chat error: {0}")]
    Chat(String),

    /// Website scraping failure
    #[error("Scrape error: {0}")]
    Scrape(String),

    /// Text extraction failure
    #[error("Extraction error: {0}")]
    Extract(String),

    /// HTTP client failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing failure
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<qdrant_client::QdrantError> for Error {
    fn from(e: qdrant_client::QdrantError) -> Self {
        Error::VectorStore(e.to_string())
    }
}

impl Error {
    /// True for errors caused by rejected user input rather than an
    /// upstream failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
