//! Object storage abstraction.
//!
//! Source documents and the vector store both live behind [`ObjectStore`], a minimal
//! key/value interface with whole-object replace semantics. Keys are `/`-separated.

mod fs;
mod memory;

pub use fs::FsObjectStore;
pub use memory::MemoryObjectStore;

use ragfile_core::AppResult;
use std::io::BufRead;

/// Sequential reader over one stored object.
pub type ObjectReader = Box<dyn BufRead + Send>;

/// Trait for object storage backends.
///
/// Implementations must make `put` atomic: a concurrent reader observes either the
/// previous object or the new one, never a mix.
pub trait ObjectStore: Send + Sync {
    /// List keys starting with `prefix`, sorted lexicographically.
    fn list(&self, prefix: &str) -> AppResult<Vec<String>>;

    /// Read a whole object.
    fn get(&self, key: &str) -> AppResult<Vec<u8>>;

    /// Open an object for sequential reading. Returns `None` when the key does not exist.
    fn open(&self, key: &str) -> AppResult<Option<ObjectReader>>;

    /// Replace an object as a whole.
    fn put(&self, key: &str, bytes: &[u8]) -> AppResult<()>;

    /// Delete one object. Returns `false` when the key did not exist.
    fn delete(&self, key: &str) -> AppResult<bool>;

    /// Delete every object under `prefix`, returning how many were removed.
    fn delete_prefix(&self, prefix: &str) -> AppResult<usize>;

    /// Size of an object in bytes, if it exists.
    fn size(&self, key: &str) -> AppResult<Option<u64>>;
}

/// Join key segments with a single `/`.
pub fn join_key(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}
