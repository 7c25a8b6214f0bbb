//! # Constants
//!
//! Default values shared by configuration, the provisioning pipeline and the HTTP server.

/// Default HTTP port for the provisioning API and UI
pub const DEFAULT_PORT: u16 = 8080;

/// Default request body limit (pull secrets and install-config overrides can be large)
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Default directory the single-page UI is served from
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Env file loaded at startup when `ENV_FILE` is not set
pub const DEFAULT_ENV_FILE: &str = "hive-ui.env";

/// Renderer executable (`helm template`)
pub const DEFAULT_HELM_BIN: &str = "helm";

/// Applier executable (`oc apply -f -`)
pub const DEFAULT_OC_BIN: &str = "oc";

/// Helm release name passed to `helm template`
pub const DEFAULT_RELEASE_NAME: &str = "hive-tenants";

/// Namespace the rendered manifests target
pub const DEFAULT_TARGET_NAMESPACE: &str = "hive";

/// Chart location relative to the repository root
pub const CHART_SUBPATH: &str = "applications/hive-tenants/charts/hive-tenants";

/// Install-config template directory relative to the repository root
pub const TEMPLATE_SUBPATH: &str = "applications/hive-tenants";

/// Suffix appended to the roadshow name to find its install-config template
pub const TEMPLATE_FILE_SUFFIX: &str = "-install-config.yaml";

/// Maximum number of characters kept per captured subprocess stream
pub const DEFAULT_OUTPUT_CAPTURE_LIMIT: usize = 64 * 1024;

/// Prefix for per-invocation staging directories under the OS temp dir
pub const STAGING_DIR_PREFIX: &str = "hive-ui-";

/// File name of the rendered install-config inside the staging directory
pub const INSTALL_CONFIG_FILE_NAME: &str = "install-config.yaml";

/// Roadshow name returned by the defaults endpoint when none is configured
pub const DEFAULT_ROADSHOW: &str = "roadshow";

/// Message returned on a successful provisioning run
pub const SUCCESS_MESSAGE: &str = "configure_hive_tenants_roadshow ran OK";
