//! Test doubles shared by the cross-module tests.

use crate::embeddings::{EmbeddingConfig, EmbeddingProvider};
use crate::rag::Synthesizer;
use crate::storage::{MemoryObjectStore, ObjectReader, ObjectStore};
use crate::store::record_uid;
use crate::types::{ChunkRecord, KnowledgeBaseConfig};
use crate::KnowledgeBase;
use async_trait::async_trait;
use ragfile_core::{AppError, AppResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Vocabulary of the keyword embedding, one dimension per entry.
pub const VOCABULARY: [&str; 5] = ["cat", "dog", "purr", "bark", "sound"];

/// Embeds text as keyword counts over [`VOCABULARY`].
pub fn keyword_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    VOCABULARY
        .iter()
        .map(|word| lower.matches(word).count() as f32)
        .collect()
}

/// Deterministic provider with call counting and scripted failures.
#[derive(Debug, Default)]
pub struct FakeProvider {
    calls: AtomicUsize,
    /// 1-based call number that fails with `EmbeddingUnavailable`
    fail_on: Option<usize>,
    /// 1-based call number that cancels the token before returning
    cancel_on: Mutex<Option<(usize, CancellationToken)>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Default::default()
        }
    }

    pub fn cancelling_on(call: usize, token: CancellationToken) -> Self {
        Self {
            cancel_on: Mutex::new(Some((call, token))),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FakeProvider {
    fn provider_name(&self) -> &str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "keywords"
    }

    fn dimensions(&self) -> usize {
        VOCABULARY.len()
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if self.fail_on == Some(call) {
            return Err(AppError::EmbeddingUnavailable("scripted failure".to_string()));
        }
        if let Some((at, token)) = self.cancel_on.lock().unwrap().as_ref() {
            if *at == call {
                token.cancel();
            }
        }

        Ok(keyword_vector(text))
    }
}

/// Synthesizer that joins the contexts it receives.
pub struct EchoSynthesizer;

#[async_trait]
impl Synthesizer for EchoSynthesizer {
    async fn synthesize(&self, _question: &str, contexts: &[String]) -> AppResult<String> {
        Ok(contexts.join(" "))
    }
}

/// Memory store whose `put` can be switched to fail.
#[derive(Debug, Default)]
pub struct FailingPuts {
    pub inner: MemoryObjectStore,
    pub fail: AtomicBool,
}

impl FailingPuts {
    pub fn wrapping(inner: MemoryObjectStore) -> Self {
        Self {
            inner,
            fail: AtomicBool::new(false),
        }
    }
}

impl ObjectStore for FailingPuts {
    fn list(&self, prefix: &str) -> AppResult<Vec<String>> {
        self.inner.list(prefix)
    }

    fn get(&self, key: &str) -> AppResult<Vec<u8>> {
        self.inner.get(key)
    }

    fn open(&self, key: &str) -> AppResult<Option<ObjectReader>> {
        self.inner.open(key)
    }

    fn put(&self, key: &str, bytes: &[u8]) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable(format!("put '{}' refused", key)));
        }
        self.inner.put(key, bytes)
    }

    fn delete(&self, key: &str) -> AppResult<bool> {
        self.inner.delete(key)
    }

    fn delete_prefix(&self, prefix: &str) -> AppResult<usize> {
        self.inner.delete_prefix(prefix)
    }

    fn size(&self, key: &str) -> AppResult<Option<u64>> {
        self.inner.size(key)
    }
}

/// Configuration sized for [`FakeProvider`], without pacing.
pub fn test_config() -> KnowledgeBaseConfig {
    KnowledgeBaseConfig {
        embed_interval_ms: 0,
        embedding: EmbeddingConfig {
            provider: "trigram".to_string(),
            dimensions: VOCABULARY.len(),
            rate_limit_backoff_ms: 1,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn knowledge_base(
    objects: Arc<MemoryObjectStore>,
    provider: Arc<FakeProvider>,
) -> KnowledgeBase {
    KnowledgeBase::new(test_config(), objects, provider)
        .with_synthesizer(Arc::new(EchoSynthesizer))
}

pub fn cats_and_dogs() -> Arc<MemoryObjectStore> {
    Arc::new(MemoryObjectStore::with_objects([
        ("docs/cats.md", "Cats purr."),
        ("docs/dogs.md", "Dogs bark."),
    ]))
}

pub fn record(path: &str, chunk_id: u32, text: &str, vector: Vec<f32>) -> ChunkRecord {
    ChunkRecord {
        uid: record_uid(path, chunk_id, text),
        path: path.to_string(),
        chunk_id,
        text: text.to_string(),
        vector,
    }
}
