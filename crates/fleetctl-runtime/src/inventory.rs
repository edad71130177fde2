//! Target selection from the container inventory.

use fleetctl_common::config::LabelSelector;
use fleetctl_common::error::Result;
use fleetctl_common::types::ContainerDescriptor;

use crate::api::{ContainerApi, ContainerSummary};

/// Fetches the inventory and keeps the containers matching `selector`.
///
/// # Errors
///
/// Returns an error if the inventory cannot be retrieved or parsed.
pub fn fetch_targets(
    api: &dyn ContainerApi,
    selector: &LabelSelector,
) -> Result<Vec<ContainerDescriptor>> {
    let summaries = api.list_containers()?;
    let listed = summaries.len();
    let targets = select_targets(summaries, selector);
    tracing::debug!(
        listed,
        matched = targets.len(),
        key = selector.key(),
        values = ?selector.values(),
        "inventory filtered"
    );
    Ok(targets)
}

/// Keeps the summaries whose labels match `selector`, preserving order.
///
/// Entries without an identifier are dropped.
#[must_use]
pub fn select_targets(
    summaries: Vec<ContainerSummary>,
    selector: &LabelSelector,
) -> Vec<ContainerDescriptor> {
    summaries
        .into_iter()
        .filter(|summary| summary.labels.as_ref().is_some_and(|l| selector.matches(l)))
        .filter_map(into_descriptor)
        .collect()
}

fn into_descriptor(summary: ContainerSummary) -> Option<ContainerDescriptor> {
    let id = summary.id.filter(|id| !id.is_empty())?;
    Some(ContainerDescriptor {
        id,
        name: summary.names.and_then(|names| names.into_iter().next()),
        state: summary.state,
    })
}
