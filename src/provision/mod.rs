//! # Provisioning Orchestrator
//!
//! Turns a [`ProvisioningRequest`] into an applied hive-tenants release:
//!
//! 1. **Validate** required fields (all missing names reported at once)
//! 2. **Parse** the pull secret as JSON
//! 3. **Resolve** the install-config template (request override or `<roadshow>-install-config.yaml`)
//! 4. **Substitute** `$NAME` / `${NAME}` placeholders
//! 5. **Stage** the rendered install-config in a private temp directory
//! 6. **Run** `helm template ... | oc apply -f -` and wait for both processes
//! 7. **Shape** the result or a classified error
//!
//! Request values are never logged; spans carry only a generated run id and the dry-run flag.

pub mod capture;
pub mod commands;
pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod pull_secret;
pub mod request;
pub mod staging;
pub mod template;
pub mod validation;

pub use error::{ErrorClass, ProvisionError};
pub use outcome::ProvisionOutcome;
pub use pipeline::{Pipeline, PipelineReport, PipelineStage, PipelineVerdict, ProcessSpec};
pub use pull_secret::PullSecret;
pub use request::ProvisioningRequest;
pub use staging::StagedInstallConfig;

use crate::config::ProvisionerConfig;
use crate::observability::metrics;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

/// A validated request with its install-config rendered in memory
#[derive(Debug)]
pub struct RenderedInstallConfig {
    pub pull_secret: PullSecret,
    pub content: String,
}

/// Runs provisioning requests against a fixed configuration
#[derive(Debug, Clone)]
pub struct Provisioner {
    config: Arc<ProvisionerConfig>,
}

impl Provisioner {
    pub fn new(config: ProvisionerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ProvisionerConfig {
        &self.config
    }

    /// Validate the request and render its install-config without touching the cluster
    pub async fn render_install_config(
        &self,
        request: &ProvisioningRequest,
    ) -> Result<RenderedInstallConfig, ProvisionError> {
        validation::validate_required(request)?;

        let pull_secret = PullSecret::parse(request.field("PULL_SECRET").unwrap_or_default())?;

        let template = template::resolve_template(
            request.template_override(),
            &self.config.template_root,
            request.field("ROADSHOW").unwrap_or_default(),
        )
        .await?;

        let vars = request.template_variables(pull_secret.canonical());
        let content = template::substitute(&template, &vars);
        debug!("Rendered install-config ({} bytes)", content.len());

        Ok(RenderedInstallConfig {
            pull_secret,
            content,
        })
    }

    /// Render, stage and apply the hive-tenants chart for a roadshow
    pub async fn configure_roadshow(
        &self,
        request: &ProvisioningRequest,
    ) -> Result<ProvisionOutcome, ProvisionError> {
        let span = info_span!(
            "provision.configure_roadshow",
            run.id = %uuid::Uuid::new_v4(),
            dry_run = request.dry_run
        );

        async {
            metrics::increment_runs_total();
            let result = self.run(request).await;
            match &result {
                Ok(_) => info!("✅ Provisioning run completed"),
                Err(e) => {
                    metrics::increment_run_failures(e.reason());
                    match e.details() {
                        Some(report) => warn!(
                            "❌ Provisioning run failed: {} (helm exit: {:?}, oc exit: {:?})",
                            e, report.renderer_exit_code, report.applier_exit_code
                        ),
                        None => warn!("❌ Provisioning run failed: {}", e),
                    }
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, request: &ProvisioningRequest) -> Result<ProvisionOutcome, ProvisionError> {
        let rendered = self.render_install_config(request).await?;
        let staged = StagedInstallConfig::stage(&rendered.content).await?;

        let pipeline = Pipeline {
            renderer: commands::renderer_command(
                &self.config,
                request,
                &rendered.pull_secret,
                staged.path(),
            ),
            applier: commands::applier_command(&self.config, request.dry_run),
            capture_limit: self.config.capture_limit,
            timeout: self.config.pipeline_timeout,
        };

        info!(
            "Running {} template | {} apply{}",
            self.config.helm_bin,
            self.config.oc_bin,
            if request.dry_run { " (server dry-run)" } else { "" }
        );
        let started = Instant::now();
        let report = pipeline.execute().await;
        metrics::observe_pipeline_duration(started.elapsed().as_secs_f64());

        // The staged install-config must outlive both processes
        drop(staged);

        report?.into_result().map(ProvisionOutcome::from)
    }
}
