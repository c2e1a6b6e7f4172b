//! Ask command handler.
//!
//! Retrieves contexts and asks the text-generation provider for a grounded answer.

use super::{open_with_synthesizer, print_json};
use clap::Args;
use ragfile_core::{config::AppConfig, AppResult};
use ragfile_knowledge::handler::DEFAULT_K;
use tokio_util::sync::CancellationToken;

/// Question used when none is given.
const DEFAULT_QUESTION: &str = "What does this project do?";

/// Answer a question from retrieved contexts
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Number of contexts to retrieve
    #[arg(short = 'k', long, default_value_t = DEFAULT_K)]
    pub top_k: usize,

    /// Print the contexts the answer was grounded on
    #[arg(long)]
    pub show_contexts: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig, cancel: &CancellationToken) -> AppResult<()> {
        let question = self.question.as_deref().unwrap_or(DEFAULT_QUESTION);
        tracing::debug!("Asking: {}", question);

        let kb = open_with_synthesizer(config)?;
        let result = kb
            .answer_with_cancel(question, self.top_k, cancel)
            .await?;

        if self.json {
            return print_json(&result);
        }

        println!("{}", result.answer);

        if self.show_contexts && !result.contexts.is_empty() {
            println!();
            println!("Contexts:");
            for (context, score) in result.contexts.iter().zip(&result.scores) {
                println!("  [{:.3}] {}", score, context);
            }
        }

        Ok(())
    }
}
