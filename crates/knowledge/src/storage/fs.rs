//! Filesystem-backed object store.

use super::{ObjectReader, ObjectStore};
use ragfile_core::{AppError, AppResult};
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Marker embedded in temporary file names written by `put`.
const TEMP_MARKER: &str = ".tmp-";

/// Object store rooted at a local directory.
///
/// Keys map to relative paths; `put` writes a sibling temp file and renames it over the
/// target, which is atomic on POSIX filesystems.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `root`. The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(AppError::StoreUnavailable(format!(
                "Invalid object key: '{}'",
                key
            )));
        }
        Ok(self.root.join(relative))
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(segments.join("/"))
    }
}

impl ObjectStore for FsObjectStore {
    fn list(&self, prefix: &str) -> AppResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.map_err(|e| {
                AppError::StoreUnavailable(format!("Failed to list {:?}: {}", self.root, e))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().contains(TEMP_MARKER) {
                continue;
            }
            if let Some(key) = self.key_for(entry.path()) {
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn get(&self, key: &str) -> AppResult<Vec<u8>> {
        let path = self.path_for(key)?;
        fs::read(&path)
            .map_err(|e| AppError::StoreUnavailable(format!("Failed to read '{}': {}", key, e)))
    }

    fn open(&self, key: &str) -> AppResult<Option<ObjectReader>> {
        let path = self.path_for(key)?;
        match File::open(&path) {
            Ok(file) => Ok(Some(Box::new(BufReader::new(file)))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::StoreUnavailable(format!(
                "Failed to open '{}': {}",
                key, e
            ))),
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> AppResult<()> {
        let path = self.path_for(key)?;
        let parent = path
            .parent()
            .ok_or_else(|| AppError::StoreUnavailable(format!("Invalid object key: '{}'", key)))?;
        fs::create_dir_all(parent).map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to create {:?}: {}", parent, e))
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_path = parent.join(format!(
            ".{}{}{}",
            file_name,
            TEMP_MARKER,
            uuid::Uuid::new_v4().simple()
        ));

        let write_result = (|| -> std::io::Result<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&temp_path, &path)
        })();

        if let Err(e) = write_result {
            let _ = fs::remove_file(&temp_path);
            return Err(AppError::StoreUnavailable(format!(
                "Failed to write '{}': {}",
                key, e
            )));
        }

        tracing::debug!("Wrote {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }

    fn delete(&self, key: &str) -> AppResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::StoreUnavailable(format!(
                "Failed to delete '{}': {}",
                key, e
            ))),
        }
    }

    fn delete_prefix(&self, prefix: &str) -> AppResult<usize> {
        let keys = self.list(prefix)?;
        for key in &keys {
            self.delete(key)?;
        }
        Ok(keys.len())
    }

    fn size(&self, key: &str) -> AppResult<Option<u64>> {
        let path = self.path_for(key)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::StoreUnavailable(format!(
                "Failed to stat '{}': {}",
                key, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_put_get_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = FsObjectStore::new(temp.path());

        store.put("rag-index/chunks.jsonl", b"line\n").unwrap();
        assert_eq!(store.get("rag-index/chunks.jsonl").unwrap(), b"line\n");
        assert_eq!(store.size("rag-index/chunks.jsonl").unwrap(), Some(5));
    }

    #[test]
    fn test_put_replaces_whole_object() {
        let temp = TempDir::new().unwrap();
        let store = FsObjectStore::new(temp.path());

        store.put("a.txt", b"first version, longer").unwrap();
        store.put("a.txt", b"second").unwrap();

        let mut reader = store.open("a.txt").unwrap().unwrap();
        let mut content = String::new();
        reader.read_to_string(&mut content).unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn test_list_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        let store = FsObjectStore::new(temp.path());

        store.put("docs/b.md", b"b").unwrap();
        store.put("docs/a.md", b"a").unwrap();
        store.put("docs/nested/c.txt", b"c").unwrap();
        store.put("rag-index/chunks.jsonl", b"").unwrap();

        let keys = store.list("docs/").unwrap();
        assert_eq!(keys, vec!["docs/a.md", "docs/b.md", "docs/nested/c.txt"]);
    }

    #[test]
    fn test_missing_root_lists_nothing() {
        let temp = TempDir::new().unwrap();
        let store = FsObjectStore::new(temp.path().join("does-not-exist"));
        assert!(store.list("").unwrap().is_empty());
    }

    #[test]
    fn test_open_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let store = FsObjectStore::new(temp.path());
        assert!(store.open("nope.jsonl").unwrap().is_none());
        assert_eq!(store.size("nope.jsonl").unwrap(), None);
    }

    #[test]
    fn test_delete_prefix() {
        let temp = TempDir::new().unwrap();
        let store = FsObjectStore::new(temp.path());

        store.put("rag-index/chunks.jsonl", b"x").unwrap();
        store.put("rag-index/old.jsonl", b"y").unwrap();
        store.put("docs/keep.md", b"z").unwrap();

        assert_eq!(store.delete_prefix("rag-index").unwrap(), 2);
        assert!(store.list("rag-index").unwrap().is_empty());
        assert_eq!(store.list("docs/").unwrap(), vec!["docs/keep.md"]);
    }

    #[test]
    fn test_delete_single_key() {
        let temp = TempDir::new().unwrap();
        let store = FsObjectStore::new(temp.path());

        store.put("rag-index/chunks.jsonl", b"x").unwrap();
        store.put("rag-index/chunks.jsonl.bak", b"y").unwrap();

        assert!(store.delete("rag-index/chunks.jsonl").unwrap());
        assert!(!store.delete("rag-index/chunks.jsonl").unwrap());
        assert_eq!(
            store.list("rag-index/").unwrap(),
            vec!["rag-index/chunks.jsonl.bak"]
        );
    }

    #[test]
    fn test_rejects_escaping_keys() {
        let temp = TempDir::new().unwrap();
        let store = FsObjectStore::new(temp.path());

        let err = store.put("../outside.txt", b"x").unwrap_err();
        assert_eq!(err.kind(), "store_unavailable");
        assert!(store.get("/etc/passwd").is_err());
    }
}
