//! Hive Provisioner Library
//!
//! Core functionality for provisioning Hive tenant cluster pools: request validation,
//! install-config rendering, and the `helm template | oc apply` pipeline, plus the HTTP
//! front end that exposes it.
//! Tests are included in the module files and under `tests/`.

pub mod config;
pub mod constants;
pub mod observability;
pub mod provision;
pub mod runtime;
pub mod server;

pub use provision::{ProvisionError, ProvisionOutcome, Provisioner, ProvisioningRequest};
