//! # fleetctl — fleet start/stop through Portainer
//!
//! Starts or stops every container carrying a given label. Configured from
//! the environment so cron jobs and CI pipelines can drive it unchanged.

mod commands;
mod output;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    output::init_logging(cli.log_format);
    load_dotenv();
    commands::execute(cli)
}

/// Loads a `.env` file for local runs. Variables already set win.
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env file"),
    }
}
