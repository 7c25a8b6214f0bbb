//! # Runtime Module
//!
//! Process bootstrap for the server binary: env files, tracing, metrics, configuration and
//! shutdown handling.

pub mod initialization;
pub mod shutdown;

pub use initialization::*;
pub use shutdown::*;
