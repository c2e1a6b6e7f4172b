//! In-memory object store.

use super::{ObjectReader, ObjectStore};
use ragfile_core::{AppError, AppResult};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::RwLock;

/// Object store kept entirely in memory.
///
/// Useful for tests and for embedding the engine where no durable storage is wanted.
/// `put` swaps the value under a write lock, so readers never see partial objects.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `(key, content)` pairs.
    pub fn with_objects<K, V>(objects: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let map = objects
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            objects: RwLock::new(map),
        }
    }

    fn poisoned() -> AppError {
        AppError::StoreUnavailable("In-memory store lock poisoned".to_string())
    }
}

impl ObjectStore for MemoryObjectStore {
    fn list(&self, prefix: &str) -> AppResult<Vec<String>> {
        let objects = self.objects.read().map_err(|_| Self::poisoned())?;
        Ok(objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn get(&self, key: &str) -> AppResult<Vec<u8>> {
        let objects = self.objects.read().map_err(|_| Self::poisoned())?;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::StoreUnavailable(format!("No such object: '{}'", key)))
    }

    fn open(&self, key: &str) -> AppResult<Option<ObjectReader>> {
        let objects = self.objects.read().map_err(|_| Self::poisoned())?;
        Ok(objects
            .get(key)
            .map(|bytes| Box::new(Cursor::new(bytes.clone())) as ObjectReader))
    }

    fn put(&self, key: &str, bytes: &[u8]) -> AppResult<()> {
        let mut objects = self.objects.write().map_err(|_| Self::poisoned())?;
        objects.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> AppResult<bool> {
        let mut objects = self.objects.write().map_err(|_| Self::poisoned())?;
        Ok(objects.remove(key).is_some())
    }

    fn delete_prefix(&self, prefix: &str) -> AppResult<usize> {
        let mut objects = self.objects.write().map_err(|_| Self::poisoned())?;
        let before = objects.len();
        objects.retain(|k, _| !k.starts_with(prefix));
        Ok(before - objects.len())
    }

    fn size(&self, key: &str) -> AppResult<Option<u64>> {
        let objects = self.objects.read().map_err(|_| Self::poisoned())?;
        Ok(objects.get(key).map(|b| b.len() as u64))
    }
}
