//! Content deduplication for chunk texts.

use std::collections::HashSet;

/// Collapse whitespace runs to one space, trim and lowercase.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Tracks normalized texts seen during one ingestion run.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with texts already known, e.g. the current store content.
    pub fn seeded<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            seen: texts.into_iter().map(|t| normalize(t.as_ref())).collect(),
        }
    }

    /// Returns true only for the first occurrence of a normalized text.
    pub fn admit(&mut self, text: &str) -> bool {
        self.seen.insert(normalize(text))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Hello \n\t World  "), "hello world");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.admit("Cats purr."));
        assert!(!dedup.admit("cats   PURR."));
        assert!(dedup.admit("Dogs bark."));
        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn test_seeded() {
        let mut dedup = Deduplicator::seeded(["Existing  text"]);
        assert!(!dedup.admit("existing text"));
        assert!(dedup.admit("new text"));
    }
}
