//! Error types for the learning core.
//!
//! The scheduler and analytics functions are infallible by design: they take
//! their full input as parameters and cannot fail on valid data. Errors only
//! arise at the evaluator's LLM boundary.

use thiserror::Error;

/// Result type alias for evaluator operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors from the LLM capability backing the answer evaluator.
///
/// `MalformedResponse` means the model answered but the payload could not be
/// used; the evaluator degrades that to a fallback rating. Everything else is
/// an infrastructure failure the caller must handle.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("completion request failed: {0}")]
    Request(String),

    #[error("completion request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("authentication with the model provider failed: {0}")]
    Auth(String),
}

impl LlmError {
    /// Whether the evaluator may degrade this error into a fallback rating
    /// instead of surfacing it.
    pub fn is_degradable(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}
