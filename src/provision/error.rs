//! # Provisioning Errors
//!
//! Error taxonomy for a provisioning run, classified into caller mistakes and internal
//! failures. Messages never contain request values.

use super::pipeline::{PipelineReport, PipelineStage};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Who is at fault for a failed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request was invalid (maps to 400)
    BadInput,
    /// Something failed on the server side (maps to 500)
    Internal,
}

/// A failed provisioning run
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("PULL_SECRET must be valid JSON (paste the pull-secret JSON as-is)")]
    InvalidPullSecret(#[source] serde_json::Error),

    #[error("ROADSHOW must be a plain template name without path separators")]
    InvalidTemplateName,

    /// `name` is the template file name; `path` stays server-side and is only logged
    #[error("install-config template {name} not found")]
    TemplateNotFound { name: String, path: PathBuf },

    #[error("failed to read install-config template {name}: {source}")]
    TemplateRead {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stage rendered install-config: {0}")]
    Staging(#[source] std::io::Error),

    #[error("Failed to start {program}: {source}")]
    Launch {
        stage: PipelineStage,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("helm template failed")]
    Render(Box<PipelineReport>),

    #[error("oc apply failed")]
    Apply(Box<PipelineReport>),

    #[error("helm | oc pipeline did not finish within {}s", .0.as_secs())]
    Timeout(Duration),
}

impl ProvisionError {
    /// Classify the error for the HTTP boundary
    pub fn class(&self) -> ErrorClass {
        match self {
            ProvisionError::MissingFields(_)
            | ProvisionError::InvalidPullSecret(_)
            | ProvisionError::InvalidTemplateName => ErrorClass::BadInput,
            ProvisionError::TemplateNotFound { .. }
            | ProvisionError::TemplateRead { .. }
            | ProvisionError::Staging(_)
            | ProvisionError::Launch { .. }
            | ProvisionError::Render(_)
            | ProvisionError::Apply(_)
            | ProvisionError::Timeout(_) => ErrorClass::Internal,
        }
    }

    /// Exit codes and captured output, for pipeline failures
    pub fn details(&self) -> Option<&PipelineReport> {
        match self {
            ProvisionError::Render(report) | ProvisionError::Apply(report) => Some(&**report),
            _ => None,
        }
    }

    /// Label used for the failure metric
    pub fn reason(&self) -> &'static str {
        match self {
            ProvisionError::MissingFields(_)
            | ProvisionError::InvalidPullSecret(_)
            | ProvisionError::InvalidTemplateName => "validation",
            ProvisionError::TemplateNotFound { .. } | ProvisionError::TemplateRead { .. } => {
                "template"
            }
            ProvisionError::Staging(_) => "staging",
            ProvisionError::Launch { .. } => "launch",
            ProvisionError::Render(_) => "render",
            ProvisionError::Apply(_) => "apply",
            ProvisionError::Timeout(_) => "timeout",
        }
    }
}
