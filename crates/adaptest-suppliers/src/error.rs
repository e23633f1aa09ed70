//! Supplier error types.
//!
//! These errors represent failures while obtaining questions from a
//! generation backend or while validating its output. The engine core
//! never sees them: a session is only constructed once intake succeeds.

use thiserror::Error;

use adaptest_core::error::QuestionError;

/// Errors that can occur when obtaining questions from a supplier.
#[derive(Debug, Error)]
pub enum SupplierError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body was not the expected question payload.
    #[error("malformed question payload: {0}")]
    MalformedPayload(String),

    /// A generated question violated the question invariants.
    #[error("invalid question: {0}")]
    InvalidQuestion(#[from] QuestionError),

    /// Too few valid questions survived validation.
    #[error("only {got} valid questions generated, need at least {minimum}")]
    InsufficientQuestions { got: usize, minimum: usize },
}

impl SupplierError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SupplierError::AuthenticationFailed(_)
                | SupplierError::MalformedPayload(_)
                | SupplierError::InvalidQuestion(_)
                | SupplierError::InsufficientQuestions { .. }
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            SupplierError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}
