//! # Renderer → Applier Pipeline
//!
//! Runs `helm template ... | oc apply -f -` as two concurrent child processes.
//!
//! The renderer's stdout pipe is handed straight to the applier as its stdin, so manifests
//! never pass through this process. Renderer stderr and both applier streams are drained
//! concurrently into bounded buffers. Both exits are awaited before any decision is made:
//! the applier may still be reading after helm exits, or may exit early and leave helm with
//! a broken pipe.

use super::capture::capture_stream;
use super::error::ProvisionError;
use serde::Serialize;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, error, warn};

/// Which side of the pipeline a process is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Renderer,
    Applier,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Renderer => f.write_str("renderer"),
            PipelineStage::Applier => f.write_str("applier"),
        }
    }
}

/// Program and arguments for one side of the pipeline
#[derive(Clone)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl ProcessSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

// Arguments carry credentials; only the program and argument count are printable
impl std::fmt::Debug for ProcessSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessSpec")
            .field("program", &self.program)
            .field("args", &self.args.len())
            .finish()
    }
}

/// Exit codes and captured output of a finished pipeline
///
/// An exit code is `None` when the process was killed by a signal or its status could not
/// be collected; both count as failure.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PipelineReport {
    #[serde(rename = "helmExitCode")]
    pub renderer_exit_code: Option<i32>,
    #[serde(rename = "ocExitCode")]
    pub applier_exit_code: Option<i32>,
    #[serde(rename = "helmStderr")]
    pub renderer_stderr: String,
    #[serde(rename = "ocStdout")]
    pub applier_stdout: String,
    #[serde(rename = "ocStderr")]
    pub applier_stderr: String,
}

/// Joint decision over both exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineVerdict {
    Succeeded,
    RenderFailed,
    ApplyFailed,
}

impl PipelineReport {
    /// Decide the outcome; an applier failure takes precedence over a renderer failure
    pub fn verdict(&self) -> PipelineVerdict {
        if self.applier_exit_code != Some(0) {
            PipelineVerdict::ApplyFailed
        } else if self.renderer_exit_code != Some(0) {
            PipelineVerdict::RenderFailed
        } else {
            PipelineVerdict::Succeeded
        }
    }

    /// Turn a failing report into the matching error
    pub fn into_result(self) -> Result<Self, ProvisionError> {
        match self.verdict() {
            PipelineVerdict::Succeeded => Ok(self),
            PipelineVerdict::RenderFailed => Err(ProvisionError::Render(Box::new(self))),
            PipelineVerdict::ApplyFailed => Err(ProvisionError::Apply(Box::new(self))),
        }
    }
}

/// A renderer piped into an applier
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub renderer: ProcessSpec,
    pub applier: ProcessSpec,
    /// Characters kept per captured stream
    pub capture_limit: usize,
    /// Kill both processes when exceeded; `None` waits forever
    pub timeout: Option<Duration>,
}

impl Pipeline {
    /// Start both processes, wait for both to exit, and report
    ///
    /// Returns `Ok` with the report whatever the exit codes are; use
    /// [`PipelineReport::into_result`] to apply the failure policy. Errors are limited to
    /// launch failures and the timeout.
    pub async fn execute(&self) -> Result<PipelineReport, ProvisionError> {
        let mut renderer = spawn(&self.renderer, PipelineStage::Renderer, Stdio::null())?;

        let handoff: Option<io::Result<Stdio>> = renderer.stdout.take().map(TryInto::try_into);
        let applier_stdin = match handoff {
            Some(Ok(stdio)) => stdio,
            Some(Err(source)) => {
                abort(&mut renderer, PipelineStage::Renderer).await;
                return Err(launch_error(&self.applier, PipelineStage::Applier, source));
            }
            None => {
                abort(&mut renderer, PipelineStage::Renderer).await;
                return Err(launch_error(
                    &self.applier,
                    PipelineStage::Applier,
                    io::Error::other("renderer stdout was not captured"),
                ));
            }
        };

        let mut applier = match spawn(&self.applier, PipelineStage::Applier, applier_stdin) {
            Ok(child) => child,
            Err(e) => {
                abort(&mut renderer, PipelineStage::Renderer).await;
                return Err(e);
            }
        };
        debug!("Started renderer and applier");

        let limit = self.capture_limit;
        let renderer_stderr = renderer.stderr.take();
        let applier_stdout = applier.stdout.take();
        let applier_stderr = applier.stderr.take();

        let joined = async {
            tokio::join!(
                renderer.wait(),
                applier.wait(),
                capture_stream(renderer_stderr, limit),
                capture_stream(applier_stdout, limit),
                capture_stream(applier_stderr, limit),
            )
        };

        let finished = match self.timeout {
            Some(deadline) => tokio::time::timeout(deadline, joined).await.ok(),
            None => Some(joined.await),
        };

        let Some((renderer_status, applier_status, renderer_stderr, applier_stdout, applier_stderr)) =
            finished
        else {
            let deadline = self.timeout.unwrap_or_default();
            error!(
                "Pipeline exceeded {}s, killing renderer and applier",
                deadline.as_secs()
            );
            abort(&mut renderer, PipelineStage::Renderer).await;
            abort(&mut applier, PipelineStage::Applier).await;
            return Err(ProvisionError::Timeout(deadline));
        };

        Ok(PipelineReport {
            renderer_exit_code: exit_code(renderer_status, PipelineStage::Renderer),
            applier_exit_code: exit_code(applier_status, PipelineStage::Applier),
            renderer_stderr,
            applier_stdout,
            applier_stderr,
        })
    }
}

/// Spawn one side of the pipeline with stdout and stderr piped
///
/// The `Command` (and with it the parent's copy of any pipe handed in as stdin) is dropped
/// before returning. Keeping it would hold the read end of helm's stdout open here, and
/// helm would block instead of seeing a broken pipe if `oc` exits early.
fn spawn(spec: &ProcessSpec, stage: PipelineStage, stdin: Stdio) -> Result<Child, ProvisionError> {
    let program = which::which(&spec.program).map_err(|e| {
        launch_error(spec, stage, io::Error::new(io::ErrorKind::NotFound, e.to_string()))
    })?;

    let mut command = Command::new(program);
    command
        .args(&spec.args)
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    command.spawn().map_err(|e| launch_error(spec, stage, e))
}

fn launch_error(spec: &ProcessSpec, stage: PipelineStage, source: io::Error) -> ProvisionError {
    error!("Failed to start {} ({}): {}", stage, spec.program, source);
    ProvisionError::Launch {
        stage,
        program: spec.program.clone(),
        source,
    }
}

/// Kill a child and reap it
async fn abort(child: &mut Child, stage: PipelineStage) {
    if let Err(e) = child.kill().await {
        warn!("Failed to kill {}: {}", stage, e);
    }
}

fn exit_code(status: io::Result<ExitStatus>, stage: PipelineStage) -> Option<i32> {
    match status {
        Ok(status) => {
            if status.code().is_none() {
                warn!("{} terminated by signal: {}", stage, status);
            }
            status.code()
        }
        Err(e) => {
            warn!("Failed to collect {} exit status: {}", stage, e);
            None
        }
    }
}
