//! Error types for ragfile.
//!
//! This module defines a unified error enum covering every error category in the
//! workspace: configuration, I/O, generation, storage, embedding, and ingestion.

use thiserror::Error;

/// Unified error type for ragfile.
///
/// All fallible functions return `Result<T, AppError>`.
/// Per-document and per-line failures are contained by their callers; the remaining
/// variants abort the current run and surface as a single error.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Text-generation provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A source document could not be read or decoded
    #[error("Failed to read source '{key}': {reason}")]
    SourceRead { key: String, reason: String },

    /// The embedding service signalled throttling
    #[error("Embedding rate limited: {0}")]
    EmbeddingRateLimited(String),

    /// The embedding service failed and retries are exhausted
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// A vector store line failed to decode
    #[error("Corrupt store line {line}: {reason}")]
    StoreCorruptLine { line: usize, reason: String },

    /// The backing object storage failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A query was submitted without any question text
    #[error("Query must not be empty")]
    EmptyQuery,

    /// The operation was cancelled before completion
    #[error("Operation cancelled")]
    Cancelled,

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Stable snake_case discriminator used in structured error output.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Llm(_) => "llm",
            AppError::Serialization(_) => "serialization",
            AppError::SourceRead { .. } => "source_read",
            AppError::EmbeddingRateLimited(_) => "embedding_rate_limited",
            AppError::EmbeddingUnavailable(_) => "embedding_unavailable",
            AppError::StoreCorruptLine { .. } => "store_corrupt_line",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::EmptyQuery => "empty_query",
            AppError::Cancelled => "cancelled",
            AppError::Other(_) => "other",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
