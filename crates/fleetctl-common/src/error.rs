//! Unified error types for the fleetctl workspace.
//!
//! Every variant here is fatal for a run. Failures of individual container
//! actions are recorded per container by the runner and never surface as a
//! [`FleetError`] unless the run opts into failing on them.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum FleetError {
    /// A configuration value is missing or malformed.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Description of the invalid configuration.
        message: String,
    },

    /// The container inventory request returned a non-success status.
    #[error("failed to retrieve containers - status {status}: {body}")]
    Retrieval {
        /// HTTP status code returned by the API.
        status: u16,
        /// Response body returned alongside the status.
        body: String,
    },

    /// A request could not be sent or its response could not be read.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// URL of the failed request.
        url: String,
        /// Description of the underlying failure.
        message: String,
    },

    /// The container inventory could not be parsed.
    #[error("error parsing container list: {source}")]
    ParseInventory {
        /// Underlying deserialization error.
        #[from]
        source: serde_json::Error,
    },

    /// The configured action is neither `start` nor `stop`.
    #[error("unknown ACTION: {value}")]
    UnknownAction {
        /// The rejected action string.
        value: String,
    },

    /// Container actions failed and the run was configured to fail on them.
    #[error("{failed} of {total} container actions failed")]
    ActionsFailed {
        /// Number of containers whose action failed.
        failed: usize,
        /// Number of containers processed.
        total: usize,
    },
}

impl FleetError {
    /// Shorthand for a [`FleetError::Configuration`] error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, FleetError>;
