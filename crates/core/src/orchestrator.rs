use crate::error::QueryError;
use crate::index::InMemoryVectorStore;
use crate::models::{EntityAnswer, ScoredChunk};
use crate::prompt::compose_entity_prompt;
use crate::traits::{TextEmbedder, TextGenerator};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_TOP_K: usize = 15;

/// Composes retrieve → compose → generate into one entity query. Holds no
/// per-request state; every call owns its own transient pipeline, so
/// concurrent queries only share the read-only store behind the `Arc`.
pub struct EntityQueryService<E, G>
where
    E: TextEmbedder,
    G: TextGenerator,
{
    store: Arc<InMemoryVectorStore<E>>,
    generator: G,
    top_k: usize,
}

impl<E, G> EntityQueryService<E, G>
where
    E: TextEmbedder + Send + Sync,
    G: TextGenerator + Send + Sync,
{
    pub fn new(store: Arc<InMemoryVectorStore<E>>, generator: G) -> Self {
        Self {
            store,
            generator,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Top-k similarity retrieval for the entity text. No caching: every call
    /// re-embeds the query and re-scans the index. A `k` larger than the
    /// index simply returns the whole index ranked.
    pub async fn retrieve(&self, entity: &str, k: usize) -> Result<Vec<ScoredChunk>, QueryError> {
        Ok(self.store.search(entity, k).await?)
    }

    /// Answers one entity query end to end. Any stage failure aborts the
    /// whole request; there are no retries and no partial answers. An empty
    /// retrieval is not a failure: the prompt is composed with empty context
    /// and the model answers anyway.
    pub async fn answer(&self, entity: &str) -> Result<EntityAnswer, QueryError> {
        let context = self.retrieve(entity, self.top_k).await?;
        debug!(entity, retrieved = context.len(), "context retrieved");

        let prompt = compose_entity_prompt(entity, &context);
        let entity_summary_answer = self.generator.generate(&prompt).await?;

        Ok(EntityAnswer {
            entity: entity.to_string(),
            context,
            entity_summary_answer,
        })
    }
}
