//! Container API abstraction.

use std::collections::HashMap;

use fleetctl_common::error::Result;
use fleetctl_common::types::{Action, ContainerId};
use serde::Deserialize;

use crate::error::ActionRequestError;

/// One entry of the Docker `containers/json` listing.
///
/// Every field may be absent or `null` in the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSummary {
    /// Container identifier.
    pub id: Option<ContainerId>,
    /// Container names, each usually prefixed with `/`.
    pub names: Option<Vec<String>>,
    /// Container labels.
    pub labels: Option<HashMap<String, String>>,
    /// Docker state such as `running` or `exited`.
    pub state: Option<String>,
}

/// Raw response to a start/stop request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, possibly empty.
    pub body: String,
}

impl ActionResponse {
    /// Returns whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Remote container-management API.
///
/// Implemented over HTTP by [`crate::client::PortainerClient`]; tests
/// substitute recording fakes.
pub trait ContainerApi {
    /// Lists every container on the endpoint, including stopped ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a
    /// non-success status, or the payload cannot be parsed.
    fn list_containers(&self) -> Result<Vec<ContainerSummary>>;

    /// Sends `action` for the container `id`.
    ///
    /// Any HTTP status is returned as a response; only failures to complete
    /// the exchange are errors.
    ///
    /// # Errors
    ///
    /// Returns [`ActionRequestError::Transport`] if the request cannot be
    /// sent or its response cannot be read.
    fn container_action(
        &self,
        id: &ContainerId,
        action: Action,
    ) -> std::result::Result<ActionResponse, ActionRequestError>;
}
