use crate::error::{EmbeddingServiceError, GenerationServiceError, IngestError};
use crate::models::Record;
use async_trait::async_trait;

/// Text in, fixed-dimension vector out. The embedding space's own metric is
/// what the index compares with, so one embedder must serve both sides.
#[async_trait]
pub trait TextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingServiceError>;
}

/// Prompt in, raw model text out. Output is returned verbatim; the caller
/// does not validate its structure.
#[async_trait]
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationServiceError>;
}

/// Upstream store of raw records, fetched once at startup.
#[async_trait]
pub trait RecordSource {
    async fn fetch_records(&self) -> Result<Vec<Record>, IngestError>;
}
