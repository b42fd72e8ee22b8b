use thiserror::Error;

/// Embedding model call failed. Never retried internally; callers decide
/// whether the failure is fatal (ingestion) or request-scoped (retrieval).
#[derive(Debug, Error)]
pub enum EmbeddingServiceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },
}

/// Generative model call failed. Surfaced as a request failure.
#[derive(Debug, Error)]
pub enum GenerationServiceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },
}

/// Startup ingestion failure. Any variant means the index may be partially
/// built and the process must not begin serving.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source fetch error: {0}")]
    SourceFetch(String),

    #[error("embedding service error: {0}")]
    Embedding(#[from] EmbeddingServiceError),

    #[error("invalid chunking config: {0}")]
    InvalidChunkConfig(String),

    #[error("regex error: {0}")]
    RegexError(#[from] regex::Error),
}

impl From<mongodb::error::Error> for IngestError {
    fn from(error: mongodb::error::Error) -> Self {
        IngestError::SourceFetch(error.to_string())
    }
}

/// Per-request pipeline failure; other concurrent queries are unaffected.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("embedding service error: {0}")]
    Embedding(#[from] EmbeddingServiceError),

    #[error("generation service error: {0}")]
    Generation(#[from] GenerationServiceError),
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
