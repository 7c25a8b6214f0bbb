//! # Server Configuration
//!
//! HTTP server settings loaded from environment variables.

use super::{env_var_non_empty, env_var_or_default};
use crate::constants::{DEFAULT_BODY_LIMIT_BYTES, DEFAULT_PORT, DEFAULT_STATIC_DIR};
use std::path::PathBuf;

/// HTTP server configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Clone)]
pub struct ServerConfig {
    /// HTTP server port for the API, UI, metrics and health probes
    pub port: u16,
    /// Bearer token required for the provisioning endpoint and secret prefill.
    /// `None` disables authentication (and secret prefill).
    pub admin_token: Option<String>,
    /// Return secret defaults from `/api/defaults` to authorized callers
    pub prefill_secrets: bool,
    /// Directory served as the single-page UI
    pub static_dir: PathBuf,
    /// Maximum accepted JSON request body
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            admin_token: None,
            prefill_secrets: false,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            port: env_var_or_default("PORT", DEFAULT_PORT),
            admin_token: env_var_non_empty("ADMIN_TOKEN"),
            prefill_secrets: std::env::var("PREFILL_SECRETS")
                .is_ok_and(|v| v.eq_ignore_ascii_case("true")),
            static_dir: env_var_non_empty("STATIC_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from),
            body_limit_bytes: env_var_or_default("BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES),
        }
    }

    /// Check an `Authorization` header value against the configured admin token
    ///
    /// Returns `false` when no token is configured.
    pub fn is_authorized(&self, authorization: Option<&str>) -> bool {
        let Some(token) = self.admin_token.as_deref() else {
            return false;
        };
        authorization
            .and_then(|h| h.strip_prefix("Bearer "))
            .is_some_and(|presented| presented == token)
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field(
                "admin_token",
                &self.admin_token.as_ref().map(|_| "<redacted>"),
            )
            .field("prefill_secrets", &self.prefill_secrets)
            .field("static_dir", &self.static_dir)
            .field("body_limit_bytes", &self.body_limit_bytes)
            .finish()
    }
}
