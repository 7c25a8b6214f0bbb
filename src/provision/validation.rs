//! # Validation
//!
//! Required-field checks. Runs before any filesystem or subprocess work.

use super::error::ProvisionError;
use super::request::{ProvisioningRequest, REQUIRED_FIELDS};

/// Names of required fields that are absent or blank, in declaration order
pub fn missing_required_fields(request: &ProvisioningRequest) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|name| request.field(name).is_none_or(|value| value.trim().is_empty()))
        .collect()
}

/// Fail with every missing field named in a single error
pub fn validate_required(request: &ProvisioningRequest) -> Result<(), ProvisionError> {
    let missing = missing_required_fields(request);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ProvisionError::MissingFields(missing))
    }
}
