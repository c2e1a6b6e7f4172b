//! Ingest command handler.
//!
//! Chunks, embeds and stores the documents under the source prefix.

use super::{open_knowledge_base, print_json};
use clap::Args;
use ragfile_core::{config::AppConfig, AppResult};
use ragfile_knowledge::progress::{ProgressEvent, ProgressReporter};
use ragfile_knowledge::IngestOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Chunk, embed and store documents
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Write zero vectors instead of calling the embedding service
    #[arg(long)]
    pub dry_run: bool,

    /// Replace the store instead of appending to it
    #[arg(long)]
    pub truncate: bool,

    /// Maximum number of documents to ingest
    #[arg(long)]
    pub limit: Option<usize>,

    /// Source key prefix (overrides the configured one)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Print progress lines to stderr
    #[arg(long)]
    pub progress: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig, cancel: &CancellationToken) -> AppResult<()> {
        tracing::debug!("Ingest options: {:?}", self);

        let mut kb = open_knowledge_base(config)?;
        if self.progress {
            kb = kb.with_progress(ProgressReporter::new(Arc::new(|event: ProgressEvent| {
                eprintln!("{}", event.format_simple());
            })));
        }

        let options = IngestOptions {
            dry_run: self.dry_run,
            truncate: self.truncate,
            limit: self.limit,
            source_prefix: self.prefix.clone(),
        };

        let report = kb.ingest(&options, cancel).await?;

        if self.json {
            print_json(&report)?;
        } else {
            println!(
                "Indexed {} chunks from {} documents into {} ({} skipped, {} duplicates) in {:.2}s{}",
                report.indexed_count,
                report.documents_seen,
                report.destination,
                report.documents_skipped,
                report.duplicates_dropped,
                report.duration_secs,
                if report.dry_run { " [dry run]" } else { "" }
            );
        }

        Ok(())
    }
}
