//! Retrieval-augmented answering.
//!
//! `query` retrieves ranked contexts for a question; `ask` turns them into an answer
//! through a [`Synthesizer`].

pub mod ask;
pub mod query;
pub mod types;

pub use ask::{answer_with, LlmSynthesizer, Synthesizer, NO_CONTEXT_ANSWER};
pub use query::answer_query;
pub use types::{AnswerResult, QueryResult};
