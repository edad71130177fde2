//! # fleetctl-common
//!
//! Shared types, error definitions, configuration resolution, and constants
//! used across the fleetctl workspace.
//!
//! This crate is the leaf of the dependency graph. It performs no I/O beyond
//! reading environment variables and knows nothing about HTTP.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
