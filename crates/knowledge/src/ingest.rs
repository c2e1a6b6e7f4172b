//! Ingestion pipeline: documents to embedded, deduplicated chunk records.

use crate::chunker::chunk_text;
use crate::dedup::Deduplicator;
use crate::embeddings::EmbeddingGateway;
use crate::progress::ProgressReporter;
use crate::sources::{discover, SourcePolicy};
use crate::storage::ObjectStore;
use crate::store::{record_uid, ExistingContent, VectorStore, WriteMode};
use crate::types::{ChunkRecord, IngestOptions, IngestReport, KnowledgeBaseConfig};
use chrono::Utc;
use ragfile_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Enforces a minimum spacing between successive calls.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Wait until at least `interval` has passed since the previous call.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            tokio::time::sleep_until(last + self.interval).await;
        }
        self.last = Some(Instant::now());
    }
}

/// A chunk accepted for embedding.
struct PendingChunk {
    path: String,
    chunk_id: u32,
    text: String,
}

/// Builds chunk records from source documents and publishes them in one write.
pub struct IngestPipeline {
    objects: Arc<dyn ObjectStore>,
    store: VectorStore,
    gateway: EmbeddingGateway,
    config: KnowledgeBaseConfig,
    progress: ProgressReporter,
}

impl IngestPipeline {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        store: VectorStore,
        gateway: EmbeddingGateway,
        config: KnowledgeBaseConfig,
    ) -> Self {
        Self {
            objects,
            store,
            gateway,
            config,
            progress: ProgressReporter::noop(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Run one ingestion.
    ///
    /// Unreadable documents are skipped. An embedding failure or cancellation aborts the
    /// run before anything is written. Truncation replaces the store object in one put.
    pub async fn ingest(
        &self,
        options: &IngestOptions,
        cancel: &CancellationToken,
    ) -> AppResult<IngestReport> {
        let start = std::time::Instant::now();
        let destination = self.store.key().to_string();

        let policy = SourcePolicy::from_config(&self.config, options.source_prefix.as_deref());
        tracing::info!(
            "Starting ingestion from '{}' into {} (dry_run: {}, truncate: {})",
            policy.prefix,
            destination,
            options.dry_run,
            options.truncate
        );

        let keys = discover(self.objects.as_ref(), &policy, options.limit)?;
        self.progress.discover(keys.len() as u64, &policy.prefix);

        let ExistingContent { uids, mut dedup } =
            if self.config.dedup_across_runs && !options.truncate {
                self.store.existing()?
            } else {
                ExistingContent {
                    uids: Default::default(),
                    dedup: Deduplicator::new(),
                }
            };

        let total_docs = keys.len() as u64;
        let mut pending = Vec::new();
        let mut documents_skipped = 0usize;
        let mut duplicates_dropped = 0usize;

        for (i, key) in keys.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(AppError::Cancelled);
            }

            self.progress.read(i as u64 + 1, total_docs, key);
            let text = match self.read_document(key) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("{}, skipping", e);
                    documents_skipped += 1;
                    continue;
                }
            };

            let windows = chunk_text(
                &text,
                self.config.chunk_size,
                self.config.chunk_overlap,
                self.config.max_chunks_per_document,
            );

            let mut kept = 0usize;
            for window in windows {
                if !dedup.admit(&window.text) {
                    duplicates_dropped += 1;
                    continue;
                }
                if uids.contains(&record_uid(key, window.position, &window.text)) {
                    duplicates_dropped += 1;
                    continue;
                }
                kept += 1;
                pending.push(PendingChunk {
                    path: key.clone(),
                    chunk_id: window.position,
                    text: window.text,
                });
            }
            self.progress.chunk(i as u64 + 1, total_docs, kept);
        }

        let records = self.embed_all(pending, options.dry_run, cancel).await?;

        self.progress.write(records.len() as u64, &destination);
        if options.truncate {
            // The replace is the publish point; stale siblings go only after it lands.
            self.store.write(&records, WriteMode::Replace)?;
            self.store.prune_siblings()?;
        } else if !records.is_empty() {
            self.store.write(&records, WriteMode::Append)?;
        }

        let duration = start.elapsed();
        tracing::info!(
            "Ingestion completed: {} records from {} documents ({} skipped, {} duplicates) in {:.2}s",
            records.len(),
            keys.len(),
            documents_skipped,
            duplicates_dropped,
            duration.as_secs_f64()
        );

        Ok(IngestReport {
            indexed_count: records.len(),
            destination,
            documents_seen: keys.len(),
            documents_skipped,
            duplicates_dropped,
            dry_run: options.dry_run,
            duration_secs: duration.as_secs_f64(),
            finished_at: Utc::now(),
        })
    }

    fn read_document(&self, key: &str) -> AppResult<String> {
        let bytes = self.objects.get(key).map_err(|e| AppError::SourceRead {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        String::from_utf8(bytes).map_err(|e| AppError::SourceRead {
            key: key.to_string(),
            reason: format!("invalid UTF-8: {}", e),
        })
    }

    async fn embed_all(
        &self,
        pending: Vec<PendingChunk>,
        dry_run: bool,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<ChunkRecord>> {
        let total = pending.len() as u64;
        let model = self.gateway.provider().model_name().to_string();
        let mut pacer = Pacer::new(Duration::from_millis(self.config.embed_interval_ms));
        let mut records = Vec::with_capacity(pending.len());

        for (i, chunk) in pending.into_iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(AppError::Cancelled);
            }

            let vector = if dry_run {
                vec![0.0; self.gateway.dimensions()]
            } else {
                pacer.wait().await;
                self.gateway.embed(&chunk.text).await?
            };
            self.progress.embed(i as u64 + 1, total, &model);

            records.push(ChunkRecord {
                uid: record_uid(&chunk.path, chunk.chunk_id, &chunk.text),
                path: chunk.path,
                chunk_id: chunk.chunk_id,
                text: chunk.text,
                vector,
            });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pacer_spaces_calls() {
        let mut pacer = Pacer::new(Duration::from_millis(30));
        let start = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn test_first_wait_is_immediate() {
        let mut pacer = Pacer::new(Duration::from_secs(10));
        let start = Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
