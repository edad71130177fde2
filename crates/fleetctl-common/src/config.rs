//! Run configuration and its resolution from the environment.
//!
//! Resolution happens in two steps. [`EnvSettings`] gathers the raw values
//! (from the process environment or any lookup function), callers may then
//! overlay their own overrides, and [`FleetConfig::resolve`] validates the
//! result into an immutable configuration.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_PORTAINER_URL, DEFAULT_TARGET_LABEL, ENV_ACTION, ENV_API_KEY, ENV_DRY_RUN,
    ENV_ENDPOINT_ID, ENV_FAIL_ON_ERROR, ENV_PORTAINER_URL, ENV_TARGET_LABEL, ENV_TIMEOUT_SECS,
};
use crate::error::{FleetError, Result};

/// Raw, unvalidated configuration values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    /// Value of `PORTAINER_URL`.
    pub url: Option<String>,
    /// Value of `PORTAINER_API_KEY`.
    pub api_key: Option<String>,
    /// Value of `PORTAINER_ENDPOINT_ID`.
    pub endpoint_id: Option<String>,
    /// Value of `ACTION`.
    pub action: Option<String>,
    /// Value of `TARGET_LABEL`.
    pub target_label: Option<String>,
    /// Value of `DRY_RUN`.
    pub dry_run: Option<String>,
    /// Value of `FAIL_ON_ERROR`.
    pub fail_on_error: Option<String>,
    /// Value of `PORTAINER_TIMEOUT_SECS`.
    pub timeout_secs: Option<String>,
}

impl EnvSettings {
    /// Reads every setting from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads every setting through `lookup`, keyed by environment variable name.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            url: lookup(ENV_PORTAINER_URL),
            api_key: lookup(ENV_API_KEY),
            endpoint_id: lookup(ENV_ENDPOINT_ID),
            action: lookup(ENV_ACTION),
            target_label: lookup(ENV_TARGET_LABEL),
            dry_run: lookup(ENV_DRY_RUN),
            fail_on_error: lookup(ENV_FAIL_ON_ERROR),
            timeout_secs: lookup(ENV_TIMEOUT_SECS),
        }
    }
}

impl fmt::Debug for EnvSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSettings")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint_id", &self.endpoint_id)
            .field("action", &self.action)
            .field("target_label", &self.target_label)
            .field("dry_run", &self.dry_run)
            .field("fail_on_error", &self.fail_on_error)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Secret API key. Its `Debug` output never shows the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key value.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key for placing it on the wire.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Parsed `key=value[,value2,...]` label expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSelector {
    key: String,
    values: BTreeSet<String>,
    expression: String,
}

impl LabelSelector {
    /// Label key the selector looks up.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Accepted label values.
    #[must_use]
    pub const fn values(&self) -> &BTreeSet<String> {
        &self.values
    }

    /// Returns whether `labels` carries the key with an accepted value.
    ///
    /// An empty label value never matches.
    #[must_use]
    pub fn matches(&self, labels: &HashMap<String, String>) -> bool {
        labels
            .get(&self.key)
            .is_some_and(|value| !value.is_empty() && self.values.contains(value))
    }
}

impl FromStr for LabelSelector {
    type Err = FleetError;

    fn from_str(expression: &str) -> Result<Self> {
        let (key, values) = match expression.split_once('=') {
            Some((key, values)) if !values.contains('=') => (key, values),
            _ => {
                return Err(FleetError::config(format!(
                    "{ENV_TARGET_LABEL} must be in the form key=value[,value2,...], got \"{expression}\""
                )));
            }
        };

        Ok(Self {
            key: key.to_owned(),
            values: values.split(',').map(|v| v.trim().to_owned()).collect(),
            expression: expression.to_owned(),
        })
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// API base URL without a trailing slash.
    pub base_url: String,
    /// Secret sent in the API key header.
    pub api_key: ApiKey,
    /// Portainer endpoint hosting the containers.
    pub endpoint_id: String,
    /// Requested action as configured; parsed once the inventory is known.
    pub action: String,
    /// Label selector choosing the target containers.
    pub selector: LabelSelector,
    /// Log intended actions without sending them.
    pub dry_run: bool,
    /// Fail the run when any container action fails.
    pub fail_on_error: bool,
    /// Per-request timeout; the HTTP client default applies when absent.
    pub timeout: Option<Duration>,
}

impl FleetConfig {
    /// Validates raw settings into a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::Configuration`] if a required value is missing
    /// or empty, the label expression is malformed, or the timeout is not a
    /// positive integer.
    pub fn resolve(settings: EnvSettings) -> Result<Self> {
        let target_label = settings
            .target_label
            .unwrap_or_else(|| DEFAULT_TARGET_LABEL.to_owned());

        let mut missing = Vec::new();
        let api_key = required(settings.api_key, ENV_API_KEY, &mut missing);
        let endpoint_id = required(settings.endpoint_id, ENV_ENDPOINT_ID, &mut missing);
        let action = required(settings.action, ENV_ACTION, &mut missing);
        let target_label = required(Some(target_label), ENV_TARGET_LABEL, &mut missing);

        let (Some(api_key), Some(endpoint_id), Some(action), Some(target_label)) =
            (api_key, endpoint_id, action, target_label)
        else {
            return Err(FleetError::config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        };

        let selector: LabelSelector = target_label.parse()?;

        let base_url = settings
            .url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_PORTAINER_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let timeout = settings.timeout_secs.as_deref().map(parse_timeout).transpose()?;

        Ok(Self {
            base_url,
            api_key: ApiKey::new(api_key),
            endpoint_id,
            action,
            selector,
            dry_run: parse_flag(settings.dry_run.as_deref()),
            fail_on_error: parse_flag(settings.fail_on_error.as_deref()),
            timeout,
        })
    }
}

fn required(
    value: Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    let value = value.filter(|v| !v.is_empty());
    if value.is_none() {
        missing.push(name);
    }
    value
}

/// Interprets a boolean switch: only a case-insensitive `true` enables it.
fn parse_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(FleetError::config(format!(
            "{ENV_TIMEOUT_SECS} must be a positive number of seconds, got \"{raw}\""
        ))),
    }
}
