//! # Provisioning Outcome
//!
//! Success payload returned to the caller.

use super::pipeline::PipelineReport;
use crate::constants::SUCCESS_MESSAGE;
use serde::Serialize;

/// A successful provisioning run
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProvisionOutcome {
    pub ok: bool,
    pub message: String,
    #[serde(rename = "ocStdout")]
    pub applier_stdout: String,
    #[serde(rename = "ocStderr")]
    pub applier_stderr: String,
}

impl From<PipelineReport> for ProvisionOutcome {
    fn from(report: PipelineReport) -> Self {
        Self {
            ok: true,
            message: SUCCESS_MESSAGE.to_string(),
            applier_stdout: report.applier_stdout,
            applier_stderr: report.applier_stderr,
        }
    }
}
