//! Tests for ranking correctness over the vector store.

use super::support::record;
use crate::ranker::{cosine_similarity, LinearScanRanker, Ranker};
use crate::storage::MemoryObjectStore;
use crate::store::{VectorStore, WriteMode};
use crate::types::{ChunkRecord, KnowledgeBaseConfig};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Helper to create a normalized embedding.
fn normalize(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter().map(|x| x / norm).collect()
    } else {
        v.to_vec()
    }
}

fn store_with(records: &[ChunkRecord]) -> VectorStore {
    let objects = Arc::new(MemoryObjectStore::new());
    let store = VectorStore::from_config(objects, &KnowledgeBaseConfig::default());
    store.write(records, WriteMode::Replace).unwrap();
    store
}

fn texts(ranker: &LinearScanRanker, query: &[f32], k: usize) -> Vec<String> {
    ranker
        .rank(query, k)
        .unwrap()
        .into_iter()
        .map(|s| s.text)
        .collect()
}

#[test]
fn test_relevant_record_ranks_first() {
    let store = store_with(&[
        record(
            "docs/cooking.md",
            0,
            "Cooking recipes for pasta",
            normalize(&[-0.3, -0.8, 0.4, -0.2]),
        ),
        record(
            "docs/rust.md",
            0,
            "Rust is a systems programming language",
            normalize(&[1.0, 0.5, 0.2, 0.1]),
        ),
    ]);
    let ranker = LinearScanRanker::new(store);

    let results = ranker.rank(&normalize(&[0.9, 0.4, 0.3, 0.1]), 5).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].text, "Rust is a systems programming language");
    assert!(results[0].score > 0.9);
    assert!(results[1].score < 0.0);
}

#[test]
fn test_ties_keep_store_order() {
    let store = store_with(&[
        record("docs/a.md", 0, "first", vec![1.0, 0.0]),
        record("docs/a.md", 1, "low", vec![0.0, 1.0]),
        record("docs/b.md", 0, "second", vec![2.0, 0.0]),
        record("docs/c.md", 0, "third", vec![3.0, 0.0]),
    ]);
    let ranker = LinearScanRanker::new(store);

    assert_eq!(texts(&ranker, &[1.0, 0.0], 2), vec!["first", "second"]);
    assert_eq!(
        texts(&ranker, &[1.0, 0.0], 10),
        vec!["first", "second", "third", "low"]
    );
}

#[test]
fn test_repeated_queries_are_identical() {
    let records: Vec<ChunkRecord> = (0..50)
        .map(|i| {
            let x = (i as f32 * 0.37).sin();
            let y = (i as f32 * 0.11).cos();
            record("docs/many.md", i, &format!("chunk {}", i), vec![x, y, 0.5])
        })
        .collect();
    let ranker = LinearScanRanker::new(store_with(&records));
    let query = [0.3, -0.7, 0.2];

    let first = ranker.rank(&query, 7).unwrap();
    let second = ranker.rank(&query, 7).unwrap();
    assert_eq!(first, second);

    // Bounded selection matches a full stable sort.
    let mut all: Vec<(String, f32)> = records
        .iter()
        .map(|r| (r.text.clone(), cosine_similarity(&query, &r.vector)))
        .collect();
    all.sort_by(|a, b| b.1.total_cmp(&a.1));
    let expected: Vec<String> = all.into_iter().take(7).map(|(t, _)| t).collect();
    let actual: Vec<String> = first.into_iter().map(|s| s.text).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_zero_query_scores_zero_in_store_order() {
    let store = store_with(&[
        record("docs/a.md", 0, "a", vec![1.0, 0.0]),
        record("docs/b.md", 0, "b", vec![0.0, 1.0]),
    ]);
    let ranker = LinearScanRanker::new(store);

    let results = ranker.rank(&[0.0, 0.0], 2).unwrap();
    assert_eq!(results[0].text, "a");
    assert_eq!(results[1].text, "b");
    assert!(results.iter().all(|r| r.score == 0.0));
}

#[test]
fn test_orthogonal_and_zero_vectors_tie_in_store_order() {
    let store = store_with(&[
        record("docs/a.md", 0, "first", vec![0.0, -1.0]),
        record("docs/b.md", 0, "second", vec![0.0, 0.0]),
    ]);
    let ranker = LinearScanRanker::new(store);

    assert_eq!(texts(&ranker, &[-1.0, 0.0], 1), vec!["first"]);
    assert_eq!(texts(&ranker, &[-1.0, 0.0], 2), vec!["first", "second"]);
}

#[test]
fn test_duplicate_texts_returned_once() {
    let store = store_with(&[
        record("docs/a.md", 0, "Cats purr.", vec![0.5, 0.5]),
        record("docs/b.md", 0, "Cats purr.", vec![1.0, 0.0]),
        record("docs/c.md", 0, "Dogs bark.", vec![0.0, 1.0]),
    ]);
    let ranker = LinearScanRanker::new(store);

    let results = ranker.rank(&[1.0, 0.0], 3).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].text, "Cats purr.");
    // The first stored copy wins, not the better scoring one.
    assert!((results[0].score - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
}

#[test]
fn test_records_without_text_or_vector_skipped() {
    let store = store_with(&[
        record("docs/a.md", 0, "", vec![1.0, 0.0]),
        record("docs/b.md", 0, "no vector", vec![]),
        record("docs/c.md", 0, "kept", vec![0.0, 1.0]),
    ]);
    let ranker = LinearScanRanker::new(store);

    assert_eq!(texts(&ranker, &[1.0, 0.0], 5), vec!["kept"]);
}

#[test]
fn test_corrupt_lines_do_not_break_ranking() {
    let good = serde_json::to_string(&record("docs/a.md", 0, "good", vec![1.0])).unwrap();
    let objects = Arc::new(MemoryObjectStore::with_objects([(
        "rag-index/chunks.jsonl",
        format!("garbage\n{}\n{{\"vector\": \"nope\"}}\n", good),
    )]));
    let store = VectorStore::from_config(objects, &KnowledgeBaseConfig::default());
    let ranker = LinearScanRanker::new(store);

    assert_eq!(texts(&ranker, &[1.0], 4), vec!["good"]);
}

#[test]
fn test_empty_store_returns_nothing() {
    let objects = Arc::new(MemoryObjectStore::new());
    let store = VectorStore::from_config(objects, &KnowledgeBaseConfig::default());
    let ranker = LinearScanRanker::new(store);

    assert!(ranker.rank(&[1.0, 0.0], 4).unwrap().is_empty());
}

#[test]
fn test_cancelled_scan() {
    let store = store_with(&[record("docs/a.md", 0, "a", vec![1.0])]);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let ranker = LinearScanRanker::new(store).with_cancel(cancel);

    let err = ranker.rank(&[1.0], 4).unwrap_err();
    assert_eq!(err.kind(), "cancelled");
}
