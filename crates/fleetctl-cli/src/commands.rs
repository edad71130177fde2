//! CLI definition and top-level sequencing.
//!
//! Every setting comes from the environment; flags override single values
//! for ad-hoc runs.

use clap::Parser;
use fleetctl_common::config::{EnvSettings, FleetConfig};
use fleetctl_runtime::client::PortainerClient;

use crate::output::LogFormat;

/// fleetctl — start or stop labelled containers through Portainer.
#[derive(Parser, Debug)]
#[command(name = "fleetctl", version, about, long_about = None)]
pub struct Cli {
    /// Action to apply, overriding `ACTION` (`start` or `stop`).
    #[arg(long)]
    pub action: Option<String>,

    /// Label expression `key=value[,value2,...]`, overriding `TARGET_LABEL`.
    #[arg(long)]
    pub label: Option<String>,

    /// Portainer endpoint ID, overriding `PORTAINER_ENDPOINT_ID`.
    #[arg(long)]
    pub endpoint_id: Option<String>,

    /// Portainer API base URL, overriding `PORTAINER_URL`.
    #[arg(long)]
    pub url: Option<String>,

    /// Per-request timeout in seconds, overriding `PORTAINER_TIMEOUT_SECS`.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log intended actions without sending them.
    #[arg(long)]
    pub dry_run: bool,

    /// Exit non-zero when any container action fails.
    #[arg(long)]
    pub fail_on_error: bool,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Overlays the flags given on the command line onto `settings`.
    pub fn apply_overrides(&self, settings: &mut EnvSettings) {
        override_with(&mut settings.action, self.action.as_ref());
        override_with(&mut settings.target_label, self.label.as_ref());
        override_with(&mut settings.endpoint_id, self.endpoint_id.as_ref());
        override_with(&mut settings.url, self.url.as_ref());
        if let Some(secs) = self.timeout_secs {
            settings.timeout_secs = Some(secs.to_string());
        }
        if self.dry_run {
            settings.dry_run = Some("true".to_owned());
        }
        if self.fail_on_error {
            settings.fail_on_error = Some("true".to_owned());
        }
    }
}

fn override_with(slot: &mut Option<String>, value: Option<&String>) {
    if let Some(value) = value {
        *slot = Some(value.clone());
    }
}

/// Resolves the configuration and runs the fleet action.
///
/// # Errors
///
/// Returns an error on invalid configuration, a failed inventory request,
/// an unknown action, or failed container actions with `--fail-on-error`.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let mut settings = EnvSettings::from_env();
    cli.apply_overrides(&mut settings);

    let config = FleetConfig::resolve(settings)?;
    tracing::debug!(
        url = %config.base_url,
        endpoint = %config.endpoint_id,
        action = %config.action,
        label = %config.selector,
        dry_run = config.dry_run,
        "configuration resolved"
    );

    let client = PortainerClient::new(&config)?;
    let _report = fleetctl_runtime::runner::run(&client, &config)?;
    Ok(())
}
