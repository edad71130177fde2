//! Per-container action failures.

use thiserror::Error;

/// Failure of a single start/stop request.
///
/// Recorded in the container's outcome and logged; it never aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionRequestError {
    /// The API answered with a non-success status.
    #[error("status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The request could not be sent or its response could not be read.
    #[error("request failed: {message}")]
    Transport {
        /// Description of the underlying failure.
        message: String,
    },
}
