//! # Initialization
//!
//! Server initialization: env file loading, tracing subscriber setup, metrics registration
//! and application state construction.

use crate::config;
use crate::observability;
use crate::provision::Provisioner;
use crate::server::AppState;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Startup overrides supplied on the command line
#[derive(Debug, Default, Clone)]
pub struct StartupOptions<'a> {
    /// Env file to load instead of `ENV_FILE` / `hive-ui.env`
    pub env_file: Option<&'a Path>,
    /// Port to listen on instead of `PORT`
    pub port: Option<u16>,
}

/// Initialize the service and build the shared application state
///
/// This function handles:
/// - Loading env files (before any configuration is read)
/// - Tracing subscriber setup
/// - Metrics registration
/// - Configuration loading
pub fn initialize(options: &StartupOptions<'_>) -> Result<AppState> {
    // Env files first so RUST_LOG from them applies to the subscriber
    config::load_env_files(options.env_file);
    observability::logging::init_logging();

    info!(
        "Starting hive-provisioner v{}",
        env!("CARGO_PKG_VERSION")
    );

    observability::metrics::register_metrics().context("Failed to register metrics")?;

    let (provisioner_config, mut server_config, defaults) = config::load_config();
    if let Some(port) = options.port {
        server_config.port = port;
    }

    info!(
        "Chart: {}, templates: {}",
        provisioner_config.chart_path.display(),
        provisioner_config.template_root.display()
    );
    match provisioner_config.pipeline_timeout {
        Some(timeout) => info!("Pipeline timeout: {}s", timeout.as_secs()),
        None => info!("Pipeline timeout: disabled"),
    }

    if server_config.admin_token.is_none() {
        warn!("ADMIN_TOKEN is not set - the provisioning endpoint is unauthenticated");
    }
    if server_config.prefill_secrets && server_config.admin_token.is_none() {
        warn!("PREFILL_SECRETS is enabled but ADMIN_TOKEN is not set - secrets will not be returned");
    }

    Ok(AppState::new(
        Provisioner::new(provisioner_config),
        server_config,
        defaults,
    ))
}
