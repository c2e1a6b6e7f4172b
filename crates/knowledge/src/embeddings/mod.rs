//! Embedding gateway for knowledge bases.
//!
//! Wraps a provider with the call timeout, the single rate-limit retry and a dimension
//! check, so the ingestion and query paths see one failure model.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};

use ragfile_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Provider-agnostic embedding entry point.
#[derive(Debug, Clone)]
pub struct EmbeddingGateway {
    provider: Arc<dyn EmbeddingProvider>,
    dimensions: usize,
    call_timeout: Duration,
    backoff: Duration,
}

impl EmbeddingGateway {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: &EmbeddingConfig) -> Self {
        Self {
            provider,
            dimensions: config.dimensions,
            call_timeout: config.call_timeout(),
            backoff: config.rate_limit_backoff(),
        }
    }

    /// Configured vector dimension.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    /// Embed one text.
    ///
    /// A rate-limited call is retried exactly once after the fixed backoff. Any other
    /// failure propagates without retry.
    pub async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let vector = match self.call(text).await {
            Err(AppError::EmbeddingRateLimited(reason)) => {
                warn!(
                    "Embedding rate limited ({}), retrying once in {:?}",
                    reason, self.backoff
                );
                tokio::time::sleep(self.backoff).await;

                match self.call(text).await {
                    Err(AppError::EmbeddingRateLimited(reason)) => {
                        return Err(AppError::EmbeddingUnavailable(format!(
                            "still rate limited after retry: {}",
                            reason
                        )));
                    }
                    other => other?,
                }
            }
            other => other?,
        };

        if vector.len() != self.dimensions {
            return Err(AppError::EmbeddingUnavailable(format!(
                "{} returned {} dimensions, expected {}",
                self.provider.provider_name(),
                vector.len(),
                self.dimensions
            )));
        }

        Ok(vector)
    }

    async fn call(&self, text: &str) -> AppResult<Vec<f32>> {
        debug!(
            provider = self.provider.provider_name(),
            model = self.provider.model_name(),
            text_len = text.len(),
            "Embedding text"
        );

        match tokio::time::timeout(self.call_timeout, self.provider.embed(text)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::EmbeddingUnavailable(format!(
                "{} call timed out after {:?}",
                self.provider.provider_name(),
                self.call_timeout
            ))),
        }
    }
}
