//! Environment variable names, defaults, and API literals.

/// Base URL of the Portainer API.
pub const ENV_PORTAINER_URL: &str = "PORTAINER_URL";
/// API key sent with every request.
pub const ENV_API_KEY: &str = "PORTAINER_API_KEY";
/// Identifier of the Portainer endpoint hosting the containers.
pub const ENV_ENDPOINT_ID: &str = "PORTAINER_ENDPOINT_ID";
/// Requested fleet action (`start` or `stop`).
pub const ENV_ACTION: &str = "ACTION";
/// Label expression selecting the target containers.
pub const ENV_TARGET_LABEL: &str = "TARGET_LABEL";
/// Simulate-only switch.
pub const ENV_DRY_RUN: &str = "DRY_RUN";
/// Makes failed container actions fail the whole run.
pub const ENV_FAIL_ON_ERROR: &str = "FAIL_ON_ERROR";
/// Per-request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "PORTAINER_TIMEOUT_SECS";

/// Default Portainer API base URL.
pub const DEFAULT_PORTAINER_URL: &str = "http://localhost:9000/api";

/// Default label expression.
pub const DEFAULT_TARGET_LABEL: &str = "autoshutdown=true";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Docker state reported for a running container.
pub const STATE_RUNNING: &str = "running";

/// Docker state reported for a stopped container.
pub const STATE_EXITED: &str = "exited";
