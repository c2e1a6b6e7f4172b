//! Query command handler.
//!
//! Prints the ranked contexts for a question without generating an answer.

use super::{open_knowledge_base, print_json};
use clap::Args;
use ragfile_core::{config::AppConfig, AppResult};
use ragfile_knowledge::handler::DEFAULT_K;
use tokio_util::sync::CancellationToken;

/// Retrieve the most relevant contexts for a question
#[derive(Args, Debug)]
pub struct QueryCommand {
    /// Question text
    pub question: String,

    /// Number of contexts to retrieve
    #[arg(short = 'k', long, default_value_t = DEFAULT_K)]
    pub top_k: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl QueryCommand {
    pub async fn execute(&self, config: &AppConfig, cancel: &CancellationToken) -> AppResult<()> {
        let kb = open_knowledge_base(config)?;
        let result = kb
            .query_with_cancel(&self.question, self.top_k, cancel)
            .await?;

        if self.json {
            return print_json(&result);
        }

        if result.contexts.is_empty() {
            println!("No matching contexts. Run 'ragfile ingest' to populate the store.");
            return Ok(());
        }

        for (i, (context, score)) in result.contexts.iter().zip(&result.scores).enumerate() {
            println!("{}. [{:.3}] {}", i + 1, score, context);
        }

        Ok(())
    }
}
