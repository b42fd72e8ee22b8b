use crate::error::EmbeddingServiceError;
use crate::models::{Chunk, ScoredChunk};
use crate::traits::TextEmbedder;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

struct StoredChunk {
    chunk_id: String,
    text: String,
    start_index: usize,
    metadata: HashMap<String, Value>,
    embedding: Vec<f32>,
}

/// In-memory vector index over embedded chunks. Built once at startup, read
/// only afterwards: `search` takes `&self`, so the store can sit behind an
/// `Arc` and serve concurrent queries without locking.
///
/// Search is a full scan with cosine similarity, ranked descending with ties
/// kept in insertion order. Naive is fine at this scale; anything smarter
/// must preserve the same ranking.
pub struct InMemoryVectorStore<E> {
    embedder: E,
    entries: Vec<StoredChunk>,
}

impl<E> InMemoryVectorStore<E>
where
    E: TextEmbedder,
{
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embeds and stores each chunk, assigning it a fresh id. Returns the
    /// assigned ids in input order. A failed embedding call aborts the whole
    /// insert and propagates; nothing is retried here.
    pub async fn insert(
        &mut self,
        chunks: Vec<Chunk>,
    ) -> Result<Vec<String>, EmbeddingServiceError> {
        let mut ids = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let embedding = self.embedder.embed(&chunk.text).await?;
            let chunk_id = Uuid::new_v4().to_string();
            ids.push(chunk_id.clone());
            self.entries.push(StoredChunk {
                chunk_id,
                text: chunk.text,
                start_index: chunk.start_index,
                metadata: chunk.metadata,
                embedding,
            });
        }

        Ok(ids)
    }

    /// Embeds `query_text` and returns the `min(k, len)` highest-scoring
    /// chunks, most similar first.
    pub async fn search(
        &self,
        query_text: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, EmbeddingServiceError> {
        let query_embedding = self.embedder.embed(query_text).await?;

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (position, cosine_similarity(&query_embedding, &entry.embedding)))
            .collect();

        // sort_by is stable, so equal scores keep insertion order.
        scored.sort_by(|left, right| right.1.total_cmp(&left.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(position, score)| {
                let entry = &self.entries[position];
                ScoredChunk {
                    chunk_id: entry.chunk_id.clone(),
                    text: entry.text.clone(),
                    start_index: entry.start_index,
                    metadata: entry.metadata.clone(),
                    score,
                }
            })
            .collect())
    }
}

fn cosine_similarity(left: &[f32], right: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut left_norm = 0.0f32;
    let mut right_norm = 0.0f32;

    for (a, b) in left.iter().zip(right.iter()) {
        dot += a * b;
        left_norm += a * a;
        right_norm += b * b;
    }

    let denominator = left_norm.sqrt() * right_norm.sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    dot / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmbeddingServiceError;
    use crate::models::Chunk;
    use async_trait::async_trait;

    /// Deterministic character-trigram embedding, good enough for ranking
    /// assertions without a model service.
    struct FakeEmbedder {
        dimensions: usize,
    }

    #[async_trait]
    impl TextEmbedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingServiceError> {
            let mut vector = vec![0f32; self.dimensions];
            let chars: Vec<char> = text.to_lowercase().chars().collect();
            for window in chars.windows(3) {
                let token: String = window.iter().collect();
                let mut hash = 1469598103934665603u64;
                for byte in token.bytes() {
                    hash ^= byte as u64;
                    hash = hash.wrapping_mul(1099511628211);
                }
                vector[(hash % self.dimensions as u64) as usize] += 1.0;
            }
            Ok(vector)
        }
    }

    fn chunk(text: &str) -> Chunk {
        Chunk {
            text: text.to_string(),
            start_index: 0,
            metadata: Default::default(),
        }
    }

    fn store() -> InMemoryVectorStore<FakeEmbedder> {
        InMemoryVectorStore::new(FakeEmbedder { dimensions: 64 })
    }

    #[tokio::test]
    async fn insert_returns_unique_ids_in_input_order() {
        let mut store = store();
        let ids = store
            .insert(vec![chunk("first chunk"), chunk("second chunk")])
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(store.len(), 2);

        let hits = store.search("first chunk", 1).await.unwrap();
        assert_eq!(hits[0].chunk_id, ids[0]);
    }

    #[tokio::test]
    async fn exact_text_is_the_top_hit() {
        let mut store = store();
        store
            .insert(vec![
                chunk("the budget committee met on march third"),
                chunk("transport policy was debated at length"),
                chunk("a motion on school funding was carried"),
            ])
            .await
            .unwrap();

        let hits = store
            .search("the budget committee met on march third", 3)
            .await
            .unwrap();
        assert_eq!(hits[0].text, "the budget committee met on march third");
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn search_returns_at_most_k_and_all_when_k_exceeds_size() {
        let mut store = store();
        store
            .insert(vec![chunk("alpha"), chunk("beta"), chunk("gamma")])
            .await
            .unwrap();

        let hits = store.search("alpha", 2).await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = store.search("alpha", 50).await.unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let mut store = store();
        let ids = store
            .insert(vec![chunk("identical text"), chunk("identical text")])
            .await
            .unwrap();

        let hits = store.search("identical text", 2).await.unwrap();
        assert_eq!(hits[0].chunk_id, ids[0]);
        assert_eq!(hits[1].chunk_id, ids[1]);
    }

    #[tokio::test]
    async fn empty_store_returns_no_hits() {
        let store = store();
        let hits = store.search("anything", 5).await.unwrap();
        assert!(hits.is_empty());
    }
}
