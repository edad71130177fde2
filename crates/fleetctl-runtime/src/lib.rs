//! # fleetctl-runtime
//!
//! The fleet action runner.
//!
//! Handles:
//! - **Api**: the [`api::ContainerApi`] seam and the Docker container payload.
//! - **Client**: the Portainer implementation of that seam over blocking HTTP.
//! - **Inventory**: selecting target containers by label.
//! - **Runner**: applying `start`/`stop` per container and reporting the batch.

pub mod api;
pub mod client;
pub mod error;
pub mod inventory;
pub mod runner;
