//! # Pull Secret
//!
//! Parses the pull-secret JSON exactly as pasted and keeps only a canonical serialization for
//! template substitution and `--set-json`. The parsed document is scrubbed once serialized.

use super::error::ProvisionError;
use serde_json::Value;
use zeroize::Zeroize;

/// A parsed pull secret
pub struct PullSecret {
    canonical: String,
}

impl PullSecret {
    /// Parse raw pull-secret text
    ///
    /// The text must be valid JSON as-is; no unescaping is attempted.
    pub fn parse(raw: &str) -> Result<Self, ProvisionError> {
        let mut value: Value =
            serde_json::from_str(raw).map_err(ProvisionError::InvalidPullSecret)?;
        let canonical = value.to_string();
        scrub(&mut value);
        Ok(Self { canonical })
    }

    /// Compact single-line serialization of the document
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl std::fmt::Debug for PullSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PullSecret(<redacted>)")
    }
}

/// Zeroize every string value in a JSON document (object keys are left as-is)
fn scrub(value: &mut Value) {
    match value {
        Value::String(s) => s.zeroize(),
        Value::Array(items) => items.iter_mut().for_each(scrub),
        Value::Object(map) => map.values_mut().for_each(scrub),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

impl Drop for PullSecret {
    fn drop(&mut self) {
        self.canonical.zeroize();
    }
}
