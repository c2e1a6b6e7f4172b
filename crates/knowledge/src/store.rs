//! JSON-lines vector store.
//!
//! One [`ChunkRecord`] per line, every line newline-terminated. The whole object is
//! replaced on each write, so readers never observe a partial run.

use crate::dedup::{normalize, Deduplicator};
use crate::storage::{ObjectReader, ObjectStore};
use crate::types::{BaseStats, ChunkRecord, KnowledgeBaseConfig};
use ragfile_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::io::{BufRead, Read};
use std::sync::Arc;

/// Content-derived record identifier.
///
/// SHA-256 over the path, the chunk position and the normalized text, NUL separated.
pub fn record_uid(path: &str, chunk_id: u32, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    hasher.update([0u8]);
    hasher.update(chunk_id.to_string().as_bytes());
    hasher.update([0u8]);
    hasher.update(normalize(text).as_bytes());
    hex(&hasher.finalize())
}

/// SHA-256 digest of raw text, used where only identity matters.
pub(crate) fn text_digest(text: &str) -> [u8; 32] {
    Sha256::digest(text.as_bytes()).into()
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// How [`VectorStore::write`] combines new records with the current content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Replace,
    Append,
}

/// Content already present in the store, for cross-run deduplication.
#[derive(Debug, Default)]
pub struct ExistingContent {
    pub uids: HashSet<String>,
    pub dedup: Deduplicator,
}

/// Lazy iterator over stored records.
///
/// Corrupt lines are logged and skipped. Storage failures surface as errors.
pub struct RecordStream {
    reader: Option<ObjectReader>,
    line: usize,
    buf: Vec<u8>,
}

impl RecordStream {
    fn empty() -> Self {
        Self {
            reader: None,
            line: 0,
            buf: Vec::new(),
        }
    }

    fn new(reader: ObjectReader) -> Self {
        Self {
            reader: Some(reader),
            line: 0,
            buf: Vec::new(),
        }
    }
}

impl Iterator for RecordStream {
    type Item = AppResult<ChunkRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let reader = self.reader.as_mut()?;
            self.buf.clear();

            match reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.reader = None;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.reader = None;
                    return Some(Err(AppError::StoreUnavailable(format!(
                        "Failed to read store line {}: {}",
                        self.line + 1,
                        e
                    ))));
                }
            }

            self.line += 1;

            if self.buf.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }

            match serde_json::from_slice::<ChunkRecord>(&self.buf) {
                Ok(record) => return Some(Ok(record)),
                Err(e) => {
                    let err = AppError::StoreCorruptLine {
                        line: self.line,
                        reason: e.to_string(),
                    };
                    tracing::warn!("{}, skipping", err);
                }
            }
        }
    }
}

/// Vector store backed by a single object.
#[derive(Clone)]
pub struct VectorStore {
    objects: Arc<dyn ObjectStore>,
    key: String,
    index_prefix: String,
}

impl VectorStore {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        key: impl Into<String>,
        index_prefix: impl Into<String>,
    ) -> Self {
        Self {
            objects,
            key: key.into(),
            index_prefix: index_prefix.into(),
        }
    }

    pub fn from_config(objects: Arc<dyn ObjectStore>, config: &KnowledgeBaseConfig) -> Self {
        Self::new(objects, config.index_key(), config.index_prefix.clone())
    }

    /// Object key holding the records.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stream records in stored order. A missing store yields nothing.
    pub fn read(&self) -> AppResult<RecordStream> {
        Ok(match self.objects.open(&self.key)? {
            Some(reader) => RecordStream::new(reader),
            None => RecordStream::empty(),
        })
    }

    /// Publish records through a single atomic put.
    pub fn write(&self, records: &[ChunkRecord], mode: WriteMode) -> AppResult<()> {
        let mut bytes = match mode {
            WriteMode::Replace => Vec::new(),
            WriteMode::Append => self.current_bytes()?,
        };

        if !bytes.is_empty() && !bytes.ends_with(b"\n") {
            bytes.push(b'\n');
        }

        for record in records {
            serde_json::to_writer(&mut bytes, record)?;
            bytes.push(b'\n');
        }

        self.objects.put(&self.key, &bytes)?;

        tracing::debug!(
            "Wrote {} records to {} ({:?}, {} bytes)",
            records.len(),
            self.key,
            mode,
            bytes.len()
        );
        Ok(())
    }

    /// Remove everything under the index prefix.
    pub fn clear(&self) -> AppResult<usize> {
        let prefix = format!("{}/", self.index_prefix.trim_end_matches('/'));
        let removed = self.objects.delete_prefix(&prefix)?;
        tracing::info!(
            "Cleared {} objects under '{}'",
            removed,
            self.index_prefix
        );
        Ok(removed)
    }

    /// Remove everything under the index prefix except the store object itself.
    pub fn prune_siblings(&self) -> AppResult<usize> {
        let prefix = format!("{}/", self.index_prefix.trim_end_matches('/'));
        let mut removed = 0usize;
        for key in self.objects.list(&prefix)? {
            if key != self.key && self.objects.delete(&key)? {
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!("Pruned {} stale objects under '{}'", removed, prefix);
        }
        Ok(removed)
    }

    /// Uids and normalized texts currently stored.
    pub fn existing(&self) -> AppResult<ExistingContent> {
        let mut existing = ExistingContent::default();
        for record in self.read()? {
            let record = record?;
            existing.dedup.admit(&record.text);
            existing.uids.insert(record.uid);
        }
        Ok(existing)
    }

    pub fn stats(&self) -> AppResult<BaseStats> {
        let mut records = 0usize;
        let mut texts = HashSet::new();
        let mut sources = HashSet::new();
        let mut dimension = None;
        let mut dimension_mismatches = 0usize;

        for record in self.read()? {
            let record = record?;
            records += 1;
            texts.insert(text_digest(&record.text));
            sources.insert(record.path);

            match dimension {
                None => dimension = Some(record.vector.len()),
                Some(d) if d != record.vector.len() => dimension_mismatches += 1,
                Some(_) => {}
            }
        }

        Ok(BaseStats {
            index_key: self.key.clone(),
            records,
            unique_texts: texts.len(),
            sources: sources.len(),
            dimension,
            dimension_mismatches,
            bytes: self.objects.size(&self.key)?.unwrap_or(0),
        })
    }

    fn current_bytes(&self) -> AppResult<Vec<u8>> {
        let mut bytes = Vec::new();
        if let Some(mut reader) = self.objects.open(&self.key)? {
            reader.read_to_end(&mut bytes).map_err(|e| {
                AppError::StoreUnavailable(format!("Failed to read {}: {}", self.key, e))
            })?;
        }
        Ok(bytes)
    }
}
