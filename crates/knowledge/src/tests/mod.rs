//! Cross-module tests for ingestion and retrieval.

mod rag_ranking;
mod support;
