//! Error types for the `ragcore` crate.

use thiserror::Error;

/// Errors that can occur in retrieval and grounding operations.
///
/// Refusal outcomes ("I don't know") are **not** errors — they are ordinary
/// [`AskResult`](crate::document::AskResult) values. This enum only covers
/// failures that the boundary layer must map to a failure response.
#[derive(Debug, Error)]
pub enum RagError {
    /// A network call failed: unreachable service, timeout, or a non-2xx
    /// status. The message carries the service's own error text when the
    /// response body contained one.
    #[error("{call}: transport failure: {message}")]
    Transport {
        /// Which call failed (e.g. `"embeddings"`, `"chat completion"`).
        call: &'static str,
        /// A description of the failure.
        message: String,
    },

    /// A service responded 2xx but the body did not have the expected shape,
    /// e.g. a batch embedding response whose length disagrees with the input.
    #[error("{call}: malformed response: {message}")]
    MalformedResponse {
        /// Which call produced the bad body.
        call: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// Invalid configuration or invalid arguments to a store operation,
    /// such as parallel arrays of unequal length.
    #[error("validation error: {0}")]
    Validation(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
