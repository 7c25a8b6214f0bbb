//! # Command Lines
//!
//! Builds the `helm template` and `oc apply` invocations for a validated request.

use super::pipeline::ProcessSpec;
use super::pull_secret::PullSecret;
use super::request::ProvisioningRequest;
use crate::config::ProvisionerConfig;
use std::path::Path;

/// `helm template <release> <chart> --namespace=<ns> --set ... --set-json ... --set-file ...`
pub fn renderer_command(
    config: &ProvisionerConfig,
    request: &ProvisioningRequest,
    pull_secret: &PullSecret,
    install_config: &Path,
) -> ProcessSpec {
    let field = |name: &str| request.field(name).unwrap_or_default();

    let args = vec![
        "template".to_string(),
        config.release_name.clone(),
        config.chart_path.display().to_string(),
        format!("--namespace={}", config.namespace),
        "--set".to_string(),
        format!("clusterPoolName={}", field("ROADSHOW")),
        "--set".to_string(),
        format!("baseDomain={}", field("BASE_DOMAIN")),
        "--set-json".to_string(),
        format!("globalPullSecret={}", pull_secret.canonical()),
        "--set-file".to_string(),
        format!("installConfig={}", install_config.display()),
        "--set".to_string(),
        format!("guid={}", field("GUID")),
        "--set".to_string(),
        format!("aws_access_key_id={}", field("AWS_ACCESS_KEY_ID")),
        "--set".to_string(),
        format!("aws_secret_access_key={}", field("AWS_SECRET_ACCESS_KEY")),
        "--set".to_string(),
        format!("sshKey={}", field("SSH_PUBLIC_KEY")),
    ];

    ProcessSpec::new(config.helm_bin.clone(), args)
}

/// `oc apply -f -`, optionally with a server-side dry run
pub fn applier_command(config: &ProvisionerConfig, dry_run: bool) -> ProcessSpec {
    let mut args = vec!["apply", "-f", "-"];
    if dry_run {
        args.push("--dry-run=server");
    }
    ProcessSpec::new(config.oc_bin.clone(), args)
}
