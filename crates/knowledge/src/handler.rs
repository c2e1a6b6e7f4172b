//! JSON invocation entry point.
//!
//! A request with a question runs a query (or an answer when `answer` is set); any
//! other request runs an ingestion.

use crate::rag::{AnswerResult, QueryResult};
use crate::types::{IngestOptions, IngestReport};
use crate::KnowledgeBase;
use ragfile_core::AppError;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Contexts returned when a request does not set `k`.
pub const DEFAULT_K: usize = 4;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    pub question: Option<String>,
    pub k: Option<usize>,
    pub dry_run: bool,
    pub truncate: bool,
    pub limit: Option<usize>,
    pub answer: bool,
}

/// Structured error output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Query(QueryResult),
    Answer(AnswerResult),
    Ingest(IngestReport),
    Error(ErrorBody),
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }
}

/// Dispatch one request.
pub async fn handle(kb: &KnowledgeBase, request: Request, cancel: &CancellationToken) -> Response {
    let k = request.k.unwrap_or(DEFAULT_K);

    let result = match request.question {
        Some(question) if request.answer => kb
            .answer_with_cancel(&question, k, cancel)
            .await
            .map(Response::Answer),
        Some(question) => kb
            .query_with_cancel(&question, k, cancel)
            .await
            .map(Response::Query),
        None => {
            let options = IngestOptions {
                dry_run: request.dry_run,
                truncate: request.truncate,
                limit: request.limit,
                source_prefix: None,
            };
            kb.ingest(&options, cancel).await.map(Response::Ingest)
        }
    };

    result.unwrap_or_else(|e| {
        tracing::warn!("Request failed: {}", e);
        Response::Error(ErrorBody::from(&e))
    })
}

/// Parse a JSON request and dispatch it. Malformed bodies become a `serialization` error.
pub async fn handle_body(kb: &KnowledgeBase, body: &str, cancel: &CancellationToken) -> Response {
    match serde_json::from_str::<Request>(body) {
        Ok(request) => handle(kb, request, cancel).await,
        Err(e) => Response::Error(ErrorBody::from(&AppError::from(e))),
    }
}

/// Parse a JSON request, dispatch it and serialize the response.
pub async fn handle_json(kb: &KnowledgeBase, body: &str, cancel: &CancellationToken) -> String {
    let response = handle_body(kb, body, cancel).await;
    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            r#"{{"error":"failed to serialize response: {}","kind":"serialization"}}"#,
            e.to_string().replace('"', "'")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: Request = serde_json::from_str("{}").unwrap();
        assert!(request.question.is_none());
        assert!(!request.dry_run);
        assert!(!request.answer);

        let request: Request = serde_json::from_str(r#"{"question":"cats?","k":2}"#).unwrap();
        assert_eq!(request.question.as_deref(), Some("cats?"));
        assert_eq!(request.k, Some(2));
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody::from(&AppError::EmptyQuery);
        let json = serde_json::to_value(Response::Error(body)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "Query must not be empty", "kind": "empty_query"})
        );
    }
}
