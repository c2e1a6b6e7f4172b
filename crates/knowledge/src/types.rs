//! Knowledge system type definitions.

use crate::embeddings::EmbeddingConfig;
use chrono::{DateTime, Utc};
use ragfile_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Configuration for a knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeBaseConfig {
    /// Object storage root, relative to the workspace unless absolute
    #[serde(default = "default_storage_root")]
    pub storage_root: String,

    /// Key prefix under which source documents are discovered
    #[serde(default = "default_source_prefix")]
    pub source_prefix: String,

    /// Key prefix owning the vector store (cleared on truncate)
    #[serde(default = "default_index_prefix")]
    pub index_prefix: String,

    /// Vector store object name inside `index_prefix`
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Chunk window size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive windows in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Hard cap on chunks kept per document
    #[serde(default = "default_max_chunks_per_document")]
    pub max_chunks_per_document: usize,

    /// Minimum spacing between embedding calls during ingestion
    #[serde(default = "default_embed_interval_ms")]
    pub embed_interval_ms: u64,

    /// Suppress chunks already present in the store when appending
    #[serde(default)]
    pub dedup_across_runs: bool,

    /// File extensions eligible for ingestion (empty = any)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Key substrings excluded from ingestion
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Embedding service settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

fn default_storage_root() -> String {
    ".ragfile/objects".to_string()
}

fn default_source_prefix() -> String {
    "docs/".to_string()
}

fn default_index_prefix() -> String {
    "rag-index".to_string()
}

fn default_index_file() -> String {
    "chunks.jsonl".to_string()
}

fn default_chunk_size() -> usize {
    800
}

fn default_chunk_overlap() -> usize {
    120
}

fn default_max_chunks_per_document() -> usize {
    200
}

fn default_embed_interval_ms() -> u64 {
    100
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "txt".to_string()]
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            storage_root: default_storage_root(),
            source_prefix: default_source_prefix(),
            index_prefix: default_index_prefix(),
            index_file: default_index_file(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            max_chunks_per_document: default_max_chunks_per_document(),
            embed_interval_ms: default_embed_interval_ms(),
            dedup_across_runs: false,
            extensions: default_extensions(),
            exclude: Vec::new(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl KnowledgeBaseConfig {
    /// Full object key of the vector store.
    pub fn index_key(&self) -> String {
        crate::storage::join_key(&self.index_prefix, &self.index_file)
    }

    /// Reject settings that would make chunking or embedding meaningless.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 {
            return Err(AppError::Config("chunk_size must be positive".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.max_chunks_per_document == 0 {
            return Err(AppError::Config(
                "max_chunks_per_document must be positive".to_string(),
            ));
        }
        if self.index_prefix.trim_matches('/').is_empty() {
            return Err(AppError::Config("index_prefix must not be empty".to_string()));
        }
        self.embedding.validate()
    }
}

/// One line of the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Content-derived identifier
    pub uid: String,

    /// Storage key of the source document
    pub path: String,

    /// Position of the chunk within its document
    pub chunk_id: u32,

    /// Chunk text, verbatim
    pub text: String,

    /// Embedding vector
    pub vector: Vec<f32>,
}

/// Options for an ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Substitute zero vectors instead of calling the embedding service
    pub dry_run: bool,

    /// Delete existing store content before writing
    pub truncate: bool,

    /// Maximum number of source documents considered
    pub limit: Option<usize>,

    /// Override the configured source prefix
    pub source_prefix: Option<String>,
}

/// Outcome of an ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// Records written in this run
    pub indexed_count: usize,

    /// Object key the records were written to
    pub destination: String,

    /// Eligible documents considered
    pub documents_seen: usize,

    /// Documents skipped because they could not be read
    pub documents_skipped: usize,

    /// Chunks dropped as duplicates
    pub duplicates_dropped: usize,

    /// Whether zero vectors were substituted
    pub dry_run: bool,

    /// Wall time of the run
    pub duration_secs: f64,

    /// Completion timestamp
    pub finished_at: DateTime<Utc>,
}

/// Statistics for a knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseStats {
    /// Object key of the vector store
    pub index_key: String,

    /// Decodable records
    pub records: usize,

    /// Records with distinct text
    pub unique_texts: usize,

    /// Distinct source paths
    pub sources: usize,

    /// Vector dimension of the first record, if any
    pub dimension: Option<usize>,

    /// Records whose dimension differs from the first one
    pub dimension_mismatches: usize,

    /// Store size in bytes
    pub bytes: u64,
}
