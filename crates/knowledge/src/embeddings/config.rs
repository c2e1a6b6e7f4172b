//! Embedding configuration.

use ragfile_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Providers accepted by [`crate::embeddings::create_provider`].
pub const KNOWN_PROVIDERS: [&str; 2] = ["ollama", "trigram"];

/// Embedding settings for a knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "ollama" or "trigram"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier (provider-specific)
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding vector dimensions; every stored vector has this length
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Endpoint override for HTTP providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Upper bound on a single embedding call
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Fixed wait before the single retry after a rate-limit response
    #[serde(default = "default_rate_limit_backoff_ms")]
    pub rate_limit_backoff_ms: u64,
}

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_dimensions() -> usize {
    768
}

fn default_call_timeout_secs() -> u64 {
    30
}

fn default_rate_limit_backoff_ms() -> u64 {
    1000
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            dimensions: default_dimensions(),
            endpoint: None,
            call_timeout_secs: default_call_timeout_secs(),
            rate_limit_backoff_ms: default_rate_limit_backoff_ms(),
        }
    }
}

impl EmbeddingConfig {
    /// Offline configuration backed by the trigram provider.
    pub fn trigram(dimensions: usize) -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions,
            ..Default::default()
        }
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        Duration::from_millis(self.rate_limit_backoff_ms)
    }

    /// Check provider name and dimensions.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: '{}'. Supported providers: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }
        if self.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be positive".to_string(),
            ));
        }
        if self.call_timeout_secs == 0 {
            return Err(AppError::Config(
                "call_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
