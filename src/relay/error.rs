use thiserror::Error;

use crate::llm::core::error::LlmError;

/// Caller input that is rejected before the generation client is called.
///
/// `Display` is the exact reason string returned to HTTP callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Expected application/json")]
    ExpectedJson,

    #[error("Missing 'message' in body")]
    MissingMessage,

    #[error("Message too long (max {max} characters)")]
    MessageTooLong { max: usize },
}

/// Failures of a relay run, from the generation call to the output sink
#[derive(Debug, Error)]
pub enum RelayError {
    /// The fragment stream failed after output had started
    #[error("{0}")]
    StreamInterrupted(#[source] LlmError),

    /// The generation call failed before any output was produced
    #[error("{0}")]
    Internal(#[source] LlmError),

    /// CLI invoked without a message
    #[error("{0}")]
    Usage(String),

    /// The output sink stopped accepting writes (closed pipe, client gone)
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
