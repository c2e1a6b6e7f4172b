//! Knowledge base engine.
//!
//! Local-first retrieval over a flat JSON-lines vector store: documents are chunked,
//! deduplicated and embedded on ingestion, and queries rank the whole store by cosine
//! similarity.

pub mod chunker;
pub mod config;
pub mod dedup;
pub mod embeddings;
pub mod handler;
pub mod ingest;
pub mod progress;
pub mod rag;
pub mod ranker;
pub mod sources;
pub mod storage;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use embeddings::{EmbeddingConfig, EmbeddingGateway, EmbeddingProvider};
pub use rag::{AnswerResult, QueryResult, Synthesizer};
pub use ranker::{LinearScanRanker, Ranker, ScoredText};
pub use storage::{FsObjectStore, MemoryObjectStore, ObjectStore};
pub use store::{VectorStore, WriteMode};
pub use types::{BaseStats, ChunkRecord, IngestOptions, IngestReport, KnowledgeBaseConfig};

use ingest::IngestPipeline;
use progress::ProgressReporter;
use ragfile_core::{AppError, AppResult};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A knowledge base wired from its collaborators.
pub struct KnowledgeBase {
    config: KnowledgeBaseConfig,
    objects: Arc<dyn ObjectStore>,
    store: VectorStore,
    gateway: EmbeddingGateway,
    synthesizer: Option<Arc<dyn Synthesizer>>,
    progress: ProgressReporter,
}

impl KnowledgeBase {
    pub fn new(
        config: KnowledgeBaseConfig,
        objects: Arc<dyn ObjectStore>,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        let store = VectorStore::from_config(objects.clone(), &config);
        let gateway = EmbeddingGateway::new(provider, &config.embedding);

        Self {
            config,
            objects,
            store,
            gateway,
            synthesizer: None,
            progress: ProgressReporter::noop(),
        }
    }

    /// Open a filesystem-backed knowledge base with the configured embedding provider.
    pub fn open(workspace: &Path, config: KnowledgeBaseConfig) -> AppResult<Self> {
        config.validate()?;

        let root = config::get_storage_root(workspace, &config);
        tracing::debug!("Opening knowledge base at {:?}", root);

        let objects: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::new(root));
        let provider = embeddings::create_provider(&config.embedding)?;

        Ok(Self::new(config, objects, provider))
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &KnowledgeBaseConfig {
        &self.config
    }

    pub fn objects(&self) -> &Arc<dyn ObjectStore> {
        &self.objects
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Ingest documents from object storage into the vector store.
    pub async fn ingest(
        &self,
        options: &IngestOptions,
        cancel: &CancellationToken,
    ) -> AppResult<IngestReport> {
        IngestPipeline::new(
            self.objects.clone(),
            self.store.clone(),
            self.gateway.clone(),
            self.config.clone(),
        )
        .with_progress(self.progress.clone())
        .ingest(options, cancel)
        .await
    }

    /// Retrieve the `k` most relevant contexts for a question.
    pub async fn query(&self, question: &str, k: usize) -> AppResult<QueryResult> {
        self.query_with_cancel(question, k, &CancellationToken::new())
            .await
    }

    pub async fn query_with_cancel(
        &self,
        question: &str,
        k: usize,
        cancel: &CancellationToken,
    ) -> AppResult<QueryResult> {
        let ranker = LinearScanRanker::new(self.store.clone()).with_cancel(cancel.clone());
        rag::answer_query(&self.gateway, &ranker, question, k).await
    }

    /// Retrieve contexts and synthesize an answer from them.
    pub async fn answer(&self, question: &str, k: usize) -> AppResult<AnswerResult> {
        self.answer_with_cancel(question, k, &CancellationToken::new())
            .await
    }

    pub async fn answer_with_cancel(
        &self,
        question: &str,
        k: usize,
        cancel: &CancellationToken,
    ) -> AppResult<AnswerResult> {
        let synthesizer = self.synthesizer.as_ref().ok_or_else(|| {
            AppError::Config("No answer synthesizer configured".to_string())
        })?;

        let retrieved = self.query_with_cancel(question, k, cancel).await?;
        rag::answer_with(synthesizer.as_ref(), retrieved).await
    }

    pub fn stats(&self) -> AppResult<BaseStats> {
        self.store.stats()
    }

    /// Delete the vector store.
    pub fn clean(&self) -> AppResult<usize> {
        tracing::info!("Cleaning knowledge base index '{}'", self.config.index_prefix);
        self.store.clear()
    }
}
