use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A raw unit of source text: the configured source fields concatenated into
/// one body, plus provenance metadata. Owned by the ingestion pipeline until
/// chunked, then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub record_id: String,
    pub text: String,
    pub metadata: HashMap<String, Value>,
}

/// A contiguous window of a record's text. `start_index` is the character
/// offset of the window within the parent record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub start_index: usize,
    pub metadata: HashMap<String, Value>,
}

/// One element of a retrieval result, most similar first. `chunk_id` was
/// assigned when the chunk entered the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk_id: String,
    pub text: String,
    pub start_index: usize,
    pub metadata: HashMap<String, Value>,
    pub score: f32,
}

/// The answer to one entity query: the entity as entered, the retrieved
/// context it was grounded in, and the generated text verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityAnswer {
    pub entity: String,
    pub context: Vec<ScoredChunk>,
    pub entity_summary_answer: String,
}

pub const DEFAULT_CHUNK_MAX_CHARS: usize = 1_000;
pub const DEFAULT_CHUNK_OVERLAP_CHARS: usize = 200;

/// Working defaults are 1000/200; deployments may tune both through
/// configuration as long as `overlap_chars < max_chars`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkingOptions {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,
}

fn default_max_chars() -> usize {
    DEFAULT_CHUNK_MAX_CHARS
}

fn default_overlap_chars() -> usize {
    DEFAULT_CHUNK_OVERLAP_CHARS
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_CHUNK_MAX_CHARS,
            overlap_chars: DEFAULT_CHUNK_OVERLAP_CHARS,
        }
    }
}
