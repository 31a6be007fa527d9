//! Error types shared across quizroom crates.
//!
//! `ReportError` lives here rather than in `quizroom-reporter` so the engine
//! and presenters can surface reporting failures without depending on the
//! HTTP implementation.

use thiserror::Error;

/// A question bank that cannot be run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The challenge has no pages.
    #[error("challenge has no pages")]
    NoPages,

    /// A page has no questions.
    #[error("page '{page}' has no questions")]
    EmptyPage { page: String },

    /// A question offers nothing to choose from.
    #[error("question '{question}' has no options")]
    NoOptions { question: String },

    /// The correct answer is not one of the displayed options.
    #[error("question '{question}': correct answer '{answer}' is not one of its options")]
    AnswerNotInOptions { question: String, answer: String },

    /// A quiz was built from an empty question list.
    #[error("quiz has no questions")]
    NoQuestions,
}

/// Errors that can occur when delivering results to the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The endpoint answered `{"status": "error", ...}`.
    #[error("report rejected: {message}")]
    Rejected {
        message: String,
        errors: Vec<String>,
    },

    /// The response body did not match the expected envelope.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Nothing to report: the run has not reached its final phase.
    #[error("run is not complete, nothing to report")]
    Incomplete,
}

impl ReportError {
    /// Returns `true` if the endpoint received the request and answered.
    pub fn is_server_side(&self) -> bool {
        matches!(
            self,
            ReportError::Http { .. } | ReportError::Rejected { .. } | ReportError::InvalidResponse(_)
        )
    }
}
