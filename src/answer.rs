//! Answers produced by the query engine.

use serde::{Deserialize, Serialize};

/// Answer to an outlet question whose data never supports an answer.
pub const HOURS_UNAVAILABLE: &str = "Operating hours are not available for any outlet.";

/// Answer when there are no outlets to reason about.
pub const NO_OUTLET_DATA: &str = "No outlet data is available to answer this question.";

/// Answer when the completion service returned no content.
pub const NO_ANSWER_GENERATED: &str = "No answer generated.";

/// How an answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Computed exactly from outlet data by a resolver.
    Resolved,
    /// Written by the completion service.
    Generated,
    /// A fixed sentinel: nothing could answer the question.
    Unavailable,
}

/// The engine's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub answer: String,
    pub kind: AnswerKind,
}

impl QueryAnswer {
    pub fn resolved(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            kind: AnswerKind::Resolved,
        }
    }

    pub fn generated(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            kind: AnswerKind::Generated,
        }
    }

    pub fn unavailable(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            kind: AnswerKind::Unavailable,
        }
    }
}

impl std::fmt::Display for QueryAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.answer)
    }
}
