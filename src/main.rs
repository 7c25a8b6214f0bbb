//! # Hive Provisioner
//!
//! HTTP service behind the hive-ui single-page app. It renders a roadshow's install-config
//! from the submitted parameters and applies the hive-tenants chart to the cluster.
//!
//! ## Overview
//!
//! 1. **Defaults** - `GET /api/defaults` prefills the form from the environment
//! 2. **Provisioning** - `POST /api/configure-hive-tenants-roadshow` validates the request,
//!    renders the install-config and runs `helm template | oc apply -f -`
//! 3. **UI** - everything else is served from the static directory
//!
//! ## Configuration
//!
//! Environment variables (optionally from `hive-ui.env` / `.env`): `PORT`, `ADMIN_TOKEN`,
//! `PREFILL_SECRETS`, `REPO_ROOT`, `CHART_PATH`, `TEMPLATE_ROOT`, `HELM_BIN`, `OC_BIN`,
//! `PIPELINE_TIMEOUT_SECS`, and per-field defaults such as `GUID` or `BASE_DOMAIN`.

use anyhow::Result;
use clap::Parser;
use hive_provisioner::runtime::{initialize, shutdown_signal, StartupOptions};
use hive_provisioner::server::start_server;
use std::path::PathBuf;

/// Hive tenant provisioning service
#[derive(Parser, Debug)]
#[command(name = "hive-provisioner", version)]
#[command(about = "Serves the hive-ui provisioning API", long_about = None)]
struct Args {
    /// Env file with default settings (defaults to $ENV_FILE or hive-ui.env)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Port to listen on (overrides $PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let state = initialize(&StartupOptions {
        env_file: args.env_file.as_deref(),
        port: args.port,
    })?;

    start_server(state, shutdown_signal()).await
}
