//! # Install-Config Templates
//!
//! Resolves the install-config template for a request and substitutes `$NAME` / `${NAME}`
//! placeholders.
//!
//! Substitution is a single left-to-right pass. Unknown or null variables are replaced with
//! the empty string rather than rejected, so a misspelled placeholder silently renders as
//! nothing. Callers that need stricter behavior must check the template themselves.

use super::error::ProvisionError;
use crate::constants::TEMPLATE_FILE_SUFFIX;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// `$NAME` or `${NAME}` where NAME is one or more ASCII word characters
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z0-9_]+)|\$\{([A-Za-z0-9_]+)\}")
        .expect("Failed to compile placeholder regex - this should never happen")
});

/// Replace every placeholder with its variable's value, or nothing when unset
pub fn substitute(template: &str, vars: &HashMap<&str, Option<&str>>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            vars.get(name).copied().flatten().unwrap_or_default().to_string()
        })
        .into_owned()
}

/// Path of the on-disk template for a roadshow
///
/// Rejects names that would escape `template_root`.
pub fn template_path(template_root: &Path, roadshow: &str) -> Result<PathBuf, ProvisionError> {
    if roadshow.trim().is_empty() || roadshow.contains(['/', '\\']) || roadshow.contains("..") {
        return Err(ProvisionError::InvalidTemplateName);
    }
    Ok(template_root.join(format!("{roadshow}{TEMPLATE_FILE_SUFFIX}")))
}

/// Load the install-config template
///
/// A non-blank override always wins; otherwise the roadshow's template is read from
/// `template_root`.
pub async fn resolve_template(
    template_override: Option<&str>,
    template_root: &Path,
    roadshow: &str,
) -> Result<String, ProvisionError> {
    if let Some(text) = template_override.filter(|t| !t.trim().is_empty()) {
        debug!("Using install-config template override from request");
        return Ok(text.to_string());
    }

    let path = template_path(template_root, roadshow)?;
    debug!("Reading install-config template from {}", path.display());

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match tokio::fs::read_to_string(&path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Install-config template not found at {}", path.display());
            Err(ProvisionError::TemplateNotFound { name, path })
        }
        Err(source) => {
            warn!("Failed to read install-config template {}: {}", path.display(), source);
            Err(ProvisionError::TemplateRead { name, path, source })
        }
    }
}
