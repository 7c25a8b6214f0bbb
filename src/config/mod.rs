//! # Configuration
//!
//! Service configuration loaded from environment variables (optionally seeded from an env file).
//!
//! All configuration has sensible defaults and can be overridden via environment variables.
//! The environment is only read by the binaries at startup; the provisioning core receives
//! fully constructed config objects so it can be exercised in tests without touching the
//! process environment.

mod defaults;
mod provisioner;
mod server;

pub use defaults::{DefaultValues, FieldDefaults, DEFAULT_FIELDS, SECRET_FIELDS};
pub use provisioner::ProvisionerConfig;
pub use server::ServerConfig;

use std::path::Path;
use tracing::{debug, info};

/// Load env files into the process environment
///
/// `env_file` (or `ENV_FILE`, or `hive-ui.env`) is loaded first, then a standard `.env`.
/// Missing files are ignored and variables already present in the environment win.
pub fn load_env_files(env_file: Option<&Path>) {
    let primary = env_file.map_or_else(
        || {
            std::env::var("ENV_FILE")
                .unwrap_or_else(|_| crate::constants::DEFAULT_ENV_FILE.to_string())
                .into()
        },
        Path::to_path_buf,
    );

    match dotenvy::from_path(&primary) {
        Ok(()) => info!("Loaded environment defaults from {}", primary.display()),
        Err(e) => debug!("No env file loaded from {}: {}", primary.display(), e),
    }

    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded environment defaults from {}", path.display());
    }
}

/// Load all configuration from environment variables with defaults
pub fn load_config() -> (ProvisionerConfig, ServerConfig, FieldDefaults) {
    (
        ProvisionerConfig::from_env(),
        ServerConfig::from_env(),
        FieldDefaults::from_env(),
    )
}

/// Read environment variable or return default value
pub(crate) fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable, treating unset and empty as absent
pub(crate) fn env_var_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
