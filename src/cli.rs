//! # hivectl
//!
//! Operator CLI for the Hive provisioner. Runs the same orchestrator as the HTTP service,
//! without the server, using configuration from the environment.
//!
//! ## Usage
//!
//! ```bash
//! # Render a roadshow's install-config locally (no helm / oc involved)
//! hivectl render --request request.json
//!
//! # Render with an explicit template instead of <roadshow>-install-config.yaml
//! hivectl render --request request.json --template my-install-config.yaml
//!
//! # Validate against the live cluster without persisting anything
//! hivectl provision --request request.json --dry-run
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hive_provisioner::config::{self, ProvisionerConfig};
use hive_provisioner::observability::logging::init_logging;
use hive_provisioner::{Provisioner, ProvisioningRequest};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Hive provisioner CLI
#[derive(Parser, Debug)]
#[command(name = "hivectl", version)]
#[command(about = "Render and apply Hive tenant install-configs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Env file with default settings (defaults to $ENV_FILE or hive-ui.env)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a request and print its rendered install-config
    Render {
        /// JSON file with the provisioning request
        #[arg(short, long)]
        request: PathBuf,

        /// Install-config template to use instead of the roadshow's template
        #[arg(short, long)]
        template: Option<PathBuf>,
    },
    /// Run helm template | oc apply for a request and print the JSON result
    Provision {
        /// JSON file with the provisioning request
        #[arg(short, long)]
        request: PathBuf,

        /// Install-config template to use instead of the roadshow's template
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Pass --dry-run=server to oc apply
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    config::load_env_files(cli.env_file.as_deref());
    init_logging();

    let provisioner = Provisioner::new(ProvisionerConfig::from_env());

    match cli.command {
        Commands::Render { request, template } => {
            let request = load_request(&request, template.as_deref())?;
            let rendered = provisioner.render_install_config(&request).await?;
            print!("{}", rendered.content);
        }
        Commands::Provision {
            request,
            template,
            dry_run,
        } => {
            let mut request = load_request(&request, template.as_deref())?;
            request.dry_run |= dry_run;

            match provisioner.configure_roadshow(&request).await {
                Ok(outcome) => println!("{}", serde_json::to_string_pretty(&outcome)?),
                Err(e) => {
                    let body = json!({
                        "ok": false,
                        "error": e.to_string(),
                        "details": e.details(),
                    });
                    eprintln!("{}", serde_json::to_string_pretty(&body)?);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Read a request file, optionally replacing its template override with a file's contents
fn load_request(path: &Path, template: Option<&Path>) -> Result<ProvisioningRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {}", path.display()))?;
    let mut request: ProvisioningRequest = serde_json::from_str(&text)
        .with_context(|| format!("Request file {} is not a valid request", path.display()))?;

    if let Some(template) = template {
        let text = std::fs::read_to_string(template)
            .with_context(|| format!("Failed to read template {}", template.display()))?;
        request.install_config_override = Some(text);
    }

    Ok(request)
}
