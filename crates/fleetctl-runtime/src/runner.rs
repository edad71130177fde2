//! Bulk start/stop of the selected containers.
//!
//! Containers are processed one after another. Each gets its own
//! [`ActionOutcome`]; a failed request is logged and recorded, and the batch
//! moves on to the next container.

use fleetctl_common::config::FleetConfig;
use fleetctl_common::error::{FleetError, Result};
use fleetctl_common::types::{Action, ContainerDescriptor};

use crate::api::ContainerApi;
use crate::error::ActionRequestError;
use crate::inventory::fetch_targets;

/// What happened to one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Already in the state the action leads to; no request sent.
    Skipped,
    /// Dry run; the request was only logged.
    DryRun,
    /// The API accepted the request.
    Completed {
        /// HTTP status code of the response.
        status: u16,
    },
    /// The request failed or was rejected.
    Failed(ActionRequestError),
}

/// A container and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// The processed container.
    pub container: ContainerDescriptor,
    /// Outcome of the action for that container.
    pub outcome: ActionOutcome,
}

/// Outcomes of one run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    entries: Vec<BatchEntry>,
}

impl BatchReport {
    /// All entries in processing order.
    #[must_use]
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Number of processed containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no container was processed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of accepted requests.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Completed { .. }))
    }

    /// Number of skipped containers.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Skipped))
    }

    /// Number of dry-run entries.
    #[must_use]
    pub fn dry_run(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::DryRun))
    }

    /// Number of failed requests.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ActionOutcome::Failed(_)))
    }

    /// Returns whether no request failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&ActionOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Runs the whole flow: fetch, filter, then apply the configured action.
///
/// The inventory is always fetched first. An empty target set ends the run
/// successfully before the action is examined.
///
/// # Errors
///
/// Returns an error if the inventory cannot be retrieved, the action is
/// unknown, or `fail_on_error` is set and any container action failed.
pub fn run(api: &dyn ContainerApi, config: &FleetConfig) -> Result<BatchReport> {
    let targets = fetch_targets(api, &config.selector)?;
    if targets.is_empty() {
        tracing::info!("No container found with label {}", config.selector);
        return Ok(BatchReport::default());
    }

    let action: Action = config
        .action
        .parse()
        .inspect_err(|_| tracing::error!("Unknown ACTION: {}", config.action))?;

    let report = apply_action(api, action, &targets, config.dry_run);
    tracing::info!(
        action = %action,
        matched = report.len(),
        completed = report.completed(),
        skipped = report.skipped(),
        dry_run = report.dry_run(),
        failed = report.failed(),
        "fleet {action} finished"
    );

    if config.fail_on_error && !report.is_success() {
        return Err(FleetError::ActionsFailed {
            failed: report.failed(),
            total: report.len(),
        });
    }
    Ok(report)
}

/// Applies `action` to every container in order.
///
/// Never fails: request errors are recorded in the returned report.
pub fn apply_action(
    api: &dyn ContainerApi,
    action: Action,
    containers: &[ContainerDescriptor],
    dry_run: bool,
) -> BatchReport {
    let entries = containers
        .iter()
        .map(|container| BatchEntry {
            container: container.clone(),
            outcome: apply_one(api, action, container, dry_run),
        })
        .collect();
    BatchReport { entries }
}

fn apply_one(
    api: &dyn ContainerApi,
    action: Action,
    container: &ContainerDescriptor,
    dry_run: bool,
) -> ActionOutcome {
    let name = container.display_name();

    if container.already_in_target_state(action) {
        tracing::info!(
            container = %container.id,
            "Skipping {action}: {name} is {}.",
            action.skip_reason()
        );
        return ActionOutcome::Skipped;
    }

    if dry_run {
        tracing::info!(container = %container.id, "[DRY RUN] Would {action} {name}");
        return ActionOutcome::DryRun;
    }

    match api.container_action(&container.id, action) {
        Ok(response) if response.is_success() => {
            tracing::info!(
                container = %container.id,
                "{} {name} - Status {}",
                action.past_tense(),
                response.status
            );
            ActionOutcome::Completed {
                status: response.status,
            }
        }
        Ok(response) => {
            tracing::warn!(
                container = %container.id,
                body = %response.body,
                "{} {name} - Status {}",
                action.past_tense(),
                response.status
            );
            ActionOutcome::Failed(ActionRequestError::Status {
                status: response.status,
                body: response.body,
            })
        }
        Err(e) => {
            tracing::warn!(container = %container.id, error = %e, "Failed to {action} {name}");
            ActionOutcome::Failed(e)
        }
    }
}
