//! # Provisioner Configuration
//!
//! Where the chart and templates live, which executables to run, and pipeline limits.

use super::{env_var_non_empty, env_var_or_default};
use crate::constants::{
    CHART_SUBPATH, DEFAULT_HELM_BIN, DEFAULT_OC_BIN, DEFAULT_OUTPUT_CAPTURE_LIMIT,
    DEFAULT_RELEASE_NAME, DEFAULT_TARGET_NAMESPACE, TEMPLATE_SUBPATH,
};
use std::path::PathBuf;
use std::time::Duration;

/// Provisioning orchestrator configuration
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
    /// Helm chart rendered by `helm template`
    pub chart_path: PathBuf,
    /// Directory containing `<roadshow>-install-config.yaml` templates
    pub template_root: PathBuf,
    /// Renderer executable
    pub helm_bin: String,
    /// Applier executable
    pub oc_bin: String,
    /// Release name passed to `helm template`
    pub release_name: String,
    /// Namespace passed to `helm template`
    pub namespace: String,
    /// Kill both processes and fail when the pipeline runs longer than this.
    /// `None` waits indefinitely.
    pub pipeline_timeout: Option<Duration>,
    /// Maximum characters kept per captured stream
    pub capture_limit: usize,
}

impl ProvisionerConfig {
    /// Build a configuration rooted at `repo_root` using the standard repository layout
    pub fn for_repo_root(repo_root: impl Into<PathBuf>) -> Self {
        let repo_root = repo_root.into();
        Self {
            chart_path: repo_root.join(CHART_SUBPATH),
            template_root: repo_root.join(TEMPLATE_SUBPATH),
            helm_bin: DEFAULT_HELM_BIN.to_string(),
            oc_bin: DEFAULT_OC_BIN.to_string(),
            release_name: DEFAULT_RELEASE_NAME.to_string(),
            namespace: DEFAULT_TARGET_NAMESPACE.to_string(),
            pipeline_timeout: None,
            capture_limit: DEFAULT_OUTPUT_CAPTURE_LIMIT,
        }
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let repo_root = env_var_non_empty("REPO_ROOT").unwrap_or_else(|| ".".to_string());
        let base = Self::for_repo_root(repo_root);

        Self {
            chart_path: env_var_non_empty("CHART_PATH").map_or(base.chart_path, PathBuf::from),
            template_root: env_var_non_empty("TEMPLATE_ROOT")
                .map_or(base.template_root, PathBuf::from),
            helm_bin: env_var_non_empty("HELM_BIN").unwrap_or(base.helm_bin),
            oc_bin: env_var_non_empty("OC_BIN").unwrap_or(base.oc_bin),
            release_name: env_var_non_empty("HELM_RELEASE_NAME").unwrap_or(base.release_name),
            namespace: env_var_non_empty("TARGET_NAMESPACE").unwrap_or(base.namespace),
            pipeline_timeout: env_var_non_empty("PIPELINE_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            capture_limit: env_var_or_default("OUTPUT_CAPTURE_LIMIT", base.capture_limit),
        }
    }
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self::for_repo_root(".")
    }
}
