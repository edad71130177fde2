//! Domain primitive types used across the fleetctl workspace.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::{STATE_EXITED, STATE_RUNNING};
use crate::error::FleetError;

/// Docker identifier of a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a new container ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether the identifier is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle action applied to every matched container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Start containers that are not already running.
    Start,
    /// Stop containers that have not already exited.
    Stop,
}

impl Action {
    /// Path segment of the Docker endpoint performing this action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }

    /// Observed state in which the action is pointless and gets skipped.
    #[must_use]
    pub const fn skip_state(self) -> &'static str {
        match self {
            Self::Start => STATE_RUNNING,
            Self::Stop => STATE_EXITED,
        }
    }

    /// Past-tense verb used in progress lines.
    #[must_use]
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Start => "Started",
            Self::Stop => "Stopped",
        }
    }

    /// Human description of the skip state.
    #[must_use]
    pub const fn skip_reason(self) -> &'static str {
        match self {
            Self::Start => "already running",
            Self::Stop => "already stopped",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(FleetError::UnknownAction {
                value: other.to_owned(),
            }),
        }
    }
}

/// A container selected for the requested action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDescriptor {
    /// Docker identifier, never empty.
    pub id: ContainerId,
    /// First entry of the Docker names list, if any.
    pub name: Option<String>,
    /// State string as reported by Docker, passed through unmodified.
    pub state: Option<String>,
}

impl ContainerDescriptor {
    /// Name used in progress lines: the display name, or the ID without one.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }

    /// Returns whether the container is already in the state `action` leads to.
    #[must_use]
    pub fn already_in_target_state(&self, action: Action) -> bool {
        self.state.as_deref() == Some(action.skip_state())
    }
}
