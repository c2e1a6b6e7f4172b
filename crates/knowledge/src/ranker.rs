//! Similarity ranking over the vector store.

use crate::store::{text_digest, VectorStore};
use ragfile_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use tokio_util::sync::CancellationToken;

/// Records scanned between cancellation checks.
const CANCEL_CHECK_INTERVAL: usize = 1024;

/// A retrieved chunk text with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredText {
    pub text: String,
    pub score: f32,
}

/// Trait for retrieval backends.
///
/// Results are ordered by descending score; equal scores keep store order.
pub trait Ranker: Send + Sync {
    fn rank(&self, query: &[f32], k: usize) -> AppResult<Vec<ScoredText>>;
}

/// Calculate cosine similarity between two vectors.
///
/// Compares the common prefix when lengths differ. Zero magnitude or a non-finite
/// result scores 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    let (a, b) = (&a[..len], &b[..len]);

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    // Adding +0.0 folds -0.0 into 0.0 so the heap order sees one zero.
    let score = dot / (mag_a * mag_b) + 0.0;
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

/// Heap entry ordered so that the weakest candidate is the maximum.
struct Candidate {
    score: f32,
    position: usize,
    text: String,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.position.cmp(&other.position))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Exhaustive scan of the store keeping a bounded top-k.
#[derive(Clone)]
pub struct LinearScanRanker {
    store: VectorStore,
    cancel: CancellationToken,
}

impl LinearScanRanker {
    pub fn new(store: VectorStore) -> Self {
        Self {
            store,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl Ranker for LinearScanRanker {
    fn rank(&self, query: &[f32], k: usize) -> AppResult<Vec<ScoredText>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);
        let mut seen: HashSet<[u8; 32]> = HashSet::new();
        let mut scanned = 0usize;

        for (position, record) in self.store.read()?.enumerate() {
            if position % CANCEL_CHECK_INTERVAL == 0 && self.cancel.is_cancelled() {
                return Err(AppError::Cancelled);
            }

            let record = record?;
            scanned += 1;

            if record.text.is_empty() || record.vector.is_empty() {
                continue;
            }
            if !seen.insert(text_digest(&record.text)) {
                continue;
            }

            let candidate = Candidate {
                score: cosine_similarity(query, &record.vector),
                position,
                text: record.text,
            };

            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|weakest| candidate < *weakest) {
                heap.pop();
                heap.push(candidate);
            }
        }

        let results: Vec<ScoredText> = heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| ScoredText {
                text: c.text,
                score: c.score,
            })
            .collect();

        tracing::debug!(
            "Ranked {} records, returning {} (requested top-{})",
            scanned,
            results.len(),
            k
        );

        Ok(results)
    }
}
