//! Source document discovery.

use crate::storage::ObjectStore;
use crate::types::KnowledgeBaseConfig;
use ragfile_core::AppResult;

/// Decides which storage keys are ingested as documents.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePolicy {
    /// Keys must start with this prefix
    pub prefix: String,
    /// Accepted extensions without the dot; empty accepts any
    pub extensions: Vec<String>,
    /// Keys containing any of these substrings are skipped
    pub exclude: Vec<String>,
    /// Prefix owning the vector store, never ingested
    pub index_prefix: String,
}

impl SourcePolicy {
    pub fn from_config(config: &KnowledgeBaseConfig, prefix_override: Option<&str>) -> Self {
        Self {
            prefix: prefix_override
                .unwrap_or(config.source_prefix.as_str())
                .to_string(),
            extensions: config.extensions.clone(),
            exclude: config.exclude.clone(),
            index_prefix: config.index_prefix.clone(),
        }
    }

    /// Check a key against the policy.
    pub fn accepts(&self, key: &str) -> bool {
        if !key.starts_with(&self.prefix) {
            return false;
        }

        let index_root = self.index_prefix.trim_end_matches('/');
        if key == index_root || key.starts_with(&format!("{}/", index_root)) {
            return false;
        }

        if self.exclude.iter().any(|pattern| key.contains(pattern.as_str())) {
            return false;
        }

        if self.extensions.is_empty() {
            return true;
        }

        let name = key.rsplit('/').next().unwrap_or(key);
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .extensions
                .iter()
                .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }
}

/// List eligible document keys in listing order, truncated to `limit`.
pub fn discover(
    objects: &dyn ObjectStore,
    policy: &SourcePolicy,
    limit: Option<usize>,
) -> AppResult<Vec<String>> {
    let keys: Vec<String> = objects
        .list(&policy.prefix)?
        .into_iter()
        .filter(|key| policy.accepts(key))
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    tracing::debug!(
        "Discovered {} eligible documents under '{}'",
        keys.len(),
        policy.prefix
    );

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryObjectStore;

    fn policy() -> SourcePolicy {
        SourcePolicy::from_config(&KnowledgeBaseConfig::default(), None)
    }

    #[test]
    fn test_extension_filter() {
        let policy = policy();
        assert!(policy.accepts("docs/guide.md"));
        assert!(policy.accepts("docs/notes/README.TXT"));
        assert!(!policy.accepts("docs/image.png"));
        assert!(!policy.accepts("docs/.md"));
        assert!(!policy.accepts("other/guide.md"));
    }

    #[test]
    fn test_index_prefix_never_ingested() {
        let policy = SourcePolicy::from_config(&KnowledgeBaseConfig::default(), Some(""));
        assert!(!policy.accepts("rag-index/chunks.jsonl"));
        assert!(!policy.accepts("rag-index/notes.txt"));
        assert!(policy.accepts("rag-indexes/notes.txt"));
    }

    #[test]
    fn test_exclude_patterns() {
        let mut policy = policy();
        policy.exclude = vec!["drafts/".to_string()];
        assert!(!policy.accepts("docs/drafts/a.md"));
        assert!(policy.accepts("docs/final/a.md"));
    }

    #[test]
    fn test_empty_extension_list_accepts_any() {
        let mut policy = policy();
        policy.extensions.clear();
        assert!(policy.accepts("docs/Makefile"));
    }

    #[test]
    fn test_discover_sorted_with_limit() {
        let objects = MemoryObjectStore::with_objects([
            ("docs/c.md", "c"),
            ("docs/a.md", "a"),
            ("docs/skip.png", "x"),
            ("docs/b.txt", "b"),
        ]);

        let keys = discover(&objects, &policy(), None).unwrap();
        assert_eq!(keys, vec!["docs/a.md", "docs/b.txt", "docs/c.md"]);

        let keys = discover(&objects, &policy(), Some(2)).unwrap();
        assert_eq!(keys, vec!["docs/a.md", "docs/b.txt"]);
    }
}
