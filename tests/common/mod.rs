//! Shared fixtures for integration tests: fake `helm` / `oc` executables and a template
//! directory laid out like the hive-tenants application.

#![allow(dead_code, reason = "Not every test binary uses every fixture")]

use hive_provisioner::config::ProvisionerConfig;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::sync::{Mutex, MutexGuard};

/// Tests in one binary that write and execute scripts run one at a time. Executing a script
/// while another thread is forking with the script's write handle open fails with ETXTBSY.
static PROCESS_LOCK: Mutex<()> = Mutex::const_new(());

pub async fn serial() -> MutexGuard<'static, ()> {
    PROCESS_LOCK.lock().await
}

/// Renderer that prints the staged install-config (read from `installConfig=<path>`)
/// followed by its argument list, then exits with `exit_code`
pub const FAKE_HELM: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    installConfig=*) cat "${arg#installConfig=}" ;;
  esac
done
echo "---"
echo "helm-args: $*"
echo "helm warning" >&2
exit 0
"#;

/// Applier that echoes its stdin and reports its arguments on stderr
pub const FAKE_OC: &str = r#"#!/bin/sh
cat
echo "oc-args: $*" >&2
"#;

/// Applier that consumes stdin and rejects it
pub const FAILING_OC: &str = r#"#!/bin/sh
cat > /dev/null
echo "error: admission webhook denied the request" >&2
exit 1
"#;

/// Renderer that fails before producing any output
pub const FAILING_HELM: &str = r#"#!/bin/sh
echo "Error: chart not found" >&2
exit 1
"#;

/// A scratch workspace with a template directory and fake tools
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create workspace");
        std::fs::create_dir_all(dir.path().join("templates")).expect("create templates dir");
        Self { dir }
    }

    pub fn template_root(&self) -> PathBuf {
        self.dir.path().join("templates")
    }

    pub fn write_template(&self, roadshow: &str, content: &str) {
        std::fs::write(
            self.template_root()
                .join(format!("{roadshow}-install-config.yaml")),
            content,
        )
        .expect("write template");
    }

    /// Write an executable shell script and return its path
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        write_executable(&path, body);
        path
    }

    pub fn config(&self, helm: &Path, oc: &Path) -> ProvisionerConfig {
        ProvisionerConfig {
            chart_path: self.dir.path().join("chart"),
            template_root: self.template_root(),
            helm_bin: helm.display().to_string(),
            oc_bin: oc.display().to_string(),
            ..ProvisionerConfig::default()
        }
    }
}

#[cfg(unix)]
fn write_executable(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, body).expect("write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod script");
}

/// A request with every required field set
pub fn valid_request() -> Value {
    json!({
        "AWS_ACCESS_KEY_ID": "AKIAEXAMPLE",
        "AWS_SECRET_ACCESS_KEY": "wJalrXUtnFEMI/K7MDENG",
        "GUID": "abc12",
        "ROADSHOW": "summit",
        "BASE_DOMAIN": "sandbox.example.com",
        "PULL_SECRET": "{\"auths\": {\"quay.io\": {\"auth\": \"dXNlcjpwYXNz\"}}}",
        "SSH_PUBLIC_KEY": "ssh-ed25519 AAAAC3Nza user@host",
        "AWS_DEFAULT_REGION": "us-east-2",
    })
}

pub const SUMMIT_TEMPLATE: &str = "\
apiVersion: v1
baseDomain: ${BASE_DOMAIN}
metadata:
  name: cluster-$GUID
platform:
  aws:
    region: $AWS_DEFAULT_REGION
    type: ${INSTANCE_TYPE}
pullSecret: '$PULL_SECRET'
sshKey: $SSH_PUBLIC_KEY
";
