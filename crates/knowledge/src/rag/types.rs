//! RAG response types.

use crate::ranker::ScoredText;
use serde::{Deserialize, Serialize};

/// Ranked contexts retrieved for a question.
///
/// `contexts[i]` scored `scores[i]`; both are ordered by descending score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub question: String,
    pub k: usize,
    pub contexts: Vec<String>,
    pub scores: Vec<f32>,
}

impl QueryResult {
    pub fn from_ranked(question: impl Into<String>, k: usize, ranked: Vec<ScoredText>) -> Self {
        let (contexts, scores) = ranked.into_iter().map(|s| (s.text, s.score)).unzip();
        Self {
            question: question.into(),
            k,
            contexts,
            scores,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

/// A synthesized answer together with the contexts it was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub question: String,
    pub answer: String,
    pub contexts: Vec<String>,
    pub scores: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ranked_keeps_pairs_aligned() {
        let result = QueryResult::from_ranked(
            "q",
            3,
            vec![
                ScoredText {
                    text: "a".to_string(),
                    score: 0.9,
                },
                ScoredText {
                    text: "b".to_string(),
                    score: 0.1,
                },
            ],
        );
        assert_eq!(result.contexts, vec!["a", "b"]);
        assert_eq!(result.scores, vec![0.9, 0.1]);
        assert_eq!(result.k, 3);
    }

    #[test]
    fn test_query_result_json_shape() {
        let result = QueryResult::from_ranked("q", 4, Vec::new());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"question": "q", "k": 4, "contexts": [], "scores": []})
        );
    }
}
