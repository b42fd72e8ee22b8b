pub mod chunking;
pub mod config;
pub mod error;
pub mod index;
pub mod ingest;
pub mod models;
pub mod ollama;
pub mod orchestrator;
pub mod prompt;
pub mod source;
pub mod traits;

pub use chunking::split_records;
pub use config::{load_config, parse_config, AppConfig, DatabaseConfig, ModelConfig, RetrievalConfig};
pub use error::{
    ConfigurationError, EmbeddingServiceError, GenerationServiceError, IngestError, QueryError,
};
pub use index::InMemoryVectorStore;
pub use ingest::{ingest_records, IngestionReport};
pub use models::{
    Chunk, ChunkingOptions, EntityAnswer, Record, ScoredChunk, DEFAULT_CHUNK_MAX_CHARS,
    DEFAULT_CHUNK_OVERLAP_CHARS,
};
pub use ollama::OllamaClient;
pub use orchestrator::{EntityQueryService, DEFAULT_TOP_K};
pub use prompt::{compose_entity_prompt, ENTITY_SUMMARY_TEMPLATE};
pub use source::MongoRecordSource;
pub use traits::{RecordSource, TextEmbedder, TextGenerator};
