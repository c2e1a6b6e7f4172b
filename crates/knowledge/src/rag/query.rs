//! Query orchestration: embed the question once, then rank the store.

use crate::embeddings::EmbeddingGateway;
use crate::rag::types::QueryResult;
use crate::ranker::Ranker;
use ragfile_core::{AppError, AppResult};

/// Retrieve the `k` most similar contexts for a question.
///
/// A blank question or `k == 0` is rejected before the embedding service is called.
pub async fn answer_query(
    gateway: &EmbeddingGateway,
    ranker: &dyn Ranker,
    question: &str,
    k: usize,
) -> AppResult<QueryResult> {
    if question.trim().is_empty() {
        return Err(AppError::EmptyQuery);
    }
    if k == 0 {
        return Err(AppError::Config("k must be at least 1".to_string()));
    }

    tracing::info!("Querying knowledge base (k: {}): {}", k, question);

    let query_vector = gateway.embed(question).await?;
    let ranked = ranker.rank(&query_vector, k)?;

    match (ranked.first(), ranked.last()) {
        (Some(top), Some(low)) => tracing::info!(
            "Retrieved {} contexts (top score: {:.3}, lowest: {:.3})",
            ranked.len(),
            top.score,
            low.score
        ),
        _ => tracing::info!("No contexts found"),
    }

    Ok(QueryResult::from_ranked(question, k, ranked))
}
