//! Answer synthesis over retrieved contexts.

use crate::rag::types::{AnswerResult, QueryResult};
use async_trait::async_trait;
use ragfile_core::{AppError, AppResult};
use ragfile_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Returned when retrieval finds nothing; no generation call is made.
pub const NO_CONTEXT_ANSWER: &str = "I couldn't find anything relevant in the knowledge base.";

/// Turns a question and its contexts into a natural language answer.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, question: &str, contexts: &[String]) -> AppResult<String>;
}

/// Synthesizer backed by a text-generation client.
pub struct LlmSynthesizer {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl LlmSynthesizer {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

/// Build the grounded prompt for a question.
fn build_prompt(question: &str, contexts: &[String]) -> String {
    let bullets: Vec<String> = contexts.iter().map(|c| format!("- {}", c)).collect();

    format!(
        "Answer the question using only the context below. \
         Reply in 3 to 6 sentences. If the context is not sufficient, say so.\n\n\
         Context:\n{}\n\nQuestion: {}",
        bullets.join("\n"),
        question
    )
}

#[async_trait]
impl Synthesizer for LlmSynthesizer {
    async fn synthesize(&self, question: &str, contexts: &[String]) -> AppResult<String> {
        tracing::debug!(
            "Generating answer with {} (model: {}, contexts: {})",
            self.client.provider_name(),
            self.model,
            contexts.len()
        );

        let request = LlmRequest::new(build_prompt(question, contexts), self.model.clone())
            .with_temperature(0.3)
            .with_max_tokens(512);

        let response = self
            .client
            .complete(&request)
            .await
            .map_err(|e| AppError::Llm(format!("Answer synthesis failed: {}", e)))?;

        Ok(response.content)
    }
}

/// Synthesize an answer for retrieved contexts.
pub async fn answer_with(
    synthesizer: &dyn Synthesizer,
    retrieved: QueryResult,
) -> AppResult<AnswerResult> {
    let answer = if retrieved.is_empty() {
        tracing::info!("No contexts retrieved, skipping synthesis");
        NO_CONTEXT_ANSWER.to_string()
    } else {
        synthesizer
            .synthesize(&retrieved.question, &retrieved.contexts)
            .await?
    };

    Ok(AnswerResult {
        question: retrieved.question,
        answer,
        contexts: retrieved.contexts,
        scores: retrieved.scores,
    })
}
