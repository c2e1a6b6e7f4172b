//! Command handlers for the ragfile CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod clean;
pub mod ingest;
pub mod invoke;
pub mod query;
pub mod stats;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use clean::CleanCommand;
pub use ingest::IngestCommand;
pub use invoke::InvokeCommand;
pub use query::QueryCommand;
pub use stats::StatsCommand;

use ragfile_core::{config::AppConfig, AppError, AppResult};
use ragfile_knowledge::rag::LlmSynthesizer;
use ragfile_knowledge::{config::load_config, KnowledgeBase};
use serde::Serialize;
use std::sync::Arc;

/// Open the workspace knowledge base without a text-generation client.
pub fn open_knowledge_base(config: &AppConfig) -> AppResult<KnowledgeBase> {
    let kb_config = load_config(&config.workspace)?;
    KnowledgeBase::open(&config.workspace, kb_config)
}

/// Open the workspace knowledge base with the configured answer synthesizer.
pub fn open_with_synthesizer(config: &AppConfig) -> AppResult<KnowledgeBase> {
    config.validate()?;
    let client = ragfile_llm::create_client(&config.provider, config.endpoint.as_deref())?;
    let synthesizer = LlmSynthesizer::new(client, config.model.clone());
    Ok(open_knowledge_base(config)?.with_synthesizer(Arc::new(synthesizer)))
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Serialization(format!("JSON serialization failed: {}", e)))?;
    println!("{}", json);
    Ok(())
}
