use crate::chunking::split_records;
use crate::error::IngestError;
use crate::index::InMemoryVectorStore;
use crate::models::ChunkingOptions;
use crate::traits::{RecordSource, TextEmbedder};
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::info;

/// What one startup ingestion run loaded.
#[derive(Debug, Clone)]
pub struct IngestionReport {
    pub chunk_ids: Vec<String>,
    pub record_count: usize,
    pub completed_at: DateTime<Utc>,
}

/// Fetch all records from the source, chunk them, and embed-and-insert every
/// chunk into the store. Runs exactly once, before any query is served; each
/// step hard-depends on the previous one, so the first failure aborts the
/// run and the process must not start serving.
pub async fn ingest_records<S, E>(
    source: &S,
    store: &mut InMemoryVectorStore<E>,
    options: ChunkingOptions,
) -> Result<IngestionReport, IngestError>
where
    S: RecordSource,
    E: TextEmbedder,
{
    let started = Instant::now();

    info!("fetching records from source");
    let records = source.fetch_records().await?;
    info!(
        record_count = records.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "records fetched"
    );

    let chunks = split_records(&records, options)?;
    info!(
        chunk_count = chunks.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "records split into chunks"
    );

    let chunk_ids = store.insert(chunks).await?;
    info!(
        inserted = chunk_ids.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "chunks embedded and indexed"
    );

    Ok(IngestionReport {
        chunk_ids,
        record_count: records.len(),
        completed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EmbeddingServiceError, IngestError};
    use crate::models::Record;
    use crate::traits::{RecordSource, TextEmbedder};
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FakeSource {
        records: Vec<Record>,
        fail: bool,
    }

    #[async_trait]
    impl RecordSource for FakeSource {
        async fn fetch_records(&self) -> Result<Vec<Record>, IngestError> {
            if self.fail {
                return Err(IngestError::SourceFetch("connection refused".to_string()));
            }
            Ok(self.records.clone())
        }
    }

    struct FakeEmbedder;

    #[async_trait]
    impl TextEmbedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingServiceError> {
            Ok(vec![text.len() as f32, 1.0])
        }
    }

    fn record(id: &str, text: &str) -> Record {
        Record {
            record_id: id.to_string(),
            text: text.to_string(),
            metadata: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn ingestion_populates_the_store_and_reports_ids() {
        let source = FakeSource {
            records: vec![
                record("a", "The budget committee met on March 3rd to discuss funding."),
                record("b", &"A long transcript sentence repeated over and over. ".repeat(50)),
            ],
            fail: false,
        };
        let mut store = InMemoryVectorStore::new(FakeEmbedder);

        let report = ingest_records(&source, &mut store, ChunkingOptions::default())
            .await
            .unwrap();

        assert_eq!(report.record_count, 2);
        assert_eq!(report.chunk_ids.len(), store.len());
        // Record a fits in one window; record b is 2550 chars and must split.
        assert!(report.chunk_ids.len() > 2);
    }

    #[tokio::test]
    async fn source_failure_aborts_the_run() {
        let source = FakeSource {
            records: Vec::new(),
            fail: true,
        };
        let mut store = InMemoryVectorStore::new(FakeEmbedder);

        let result = ingest_records(&source, &mut store, ChunkingOptions::default()).await;
        assert!(matches!(result, Err(IngestError::SourceFetch(_))));
        assert!(store.is_empty());
    }
}
