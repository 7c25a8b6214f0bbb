//! # Provisioning Request
//!
//! The parameter set posted by the UI. Field names match the environment variable names the
//! install-config templates reference, so the request doubles as the substitution source.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Fields that must be present and non-blank
pub const REQUIRED_FIELDS: [&str; 7] = [
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "GUID",
    "ROADSHOW",
    "BASE_DOMAIN",
    "PULL_SECRET",
    "SSH_PUBLIC_KEY",
];

/// Optional fields referenced by install-config templates
pub const OPTIONAL_FIELDS: [&str; 7] = [
    "INSTANCE_TYPE",
    "ROOT_VOLUME_SIZE",
    "AWS_DEFAULT_REGION",
    "USER_EMAIL",
    "USER_TEAM",
    "USER_USAGE",
    "USER_USAGE_DESCRIPTION",
];

/// A single tenant provisioning request
///
/// Credentials and the pull secret are wiped from memory when the request is dropped, and
/// `Debug` only reports which fields are set.
#[derive(Default, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ProvisioningRequest {
    #[serde(rename = "AWS_ACCESS_KEY_ID", default, deserialize_with = "scalar_string")]
    pub aws_access_key_id: Option<String>,
    #[serde(rename = "AWS_SECRET_ACCESS_KEY", default, deserialize_with = "scalar_string")]
    pub aws_secret_access_key: Option<String>,
    #[serde(rename = "GUID", default, deserialize_with = "scalar_string")]
    pub guid: Option<String>,
    #[serde(rename = "ROADSHOW", default, deserialize_with = "scalar_string")]
    pub roadshow: Option<String>,
    #[serde(rename = "BASE_DOMAIN", default, deserialize_with = "scalar_string")]
    pub base_domain: Option<String>,
    #[serde(rename = "PULL_SECRET", default, deserialize_with = "scalar_string")]
    pub pull_secret: Option<String>,
    #[serde(rename = "SSH_PUBLIC_KEY", default, deserialize_with = "scalar_string")]
    pub ssh_public_key: Option<String>,

    #[serde(rename = "INSTANCE_TYPE", default, deserialize_with = "scalar_string")]
    pub instance_type: Option<String>,
    #[serde(rename = "ROOT_VOLUME_SIZE", default, deserialize_with = "scalar_string")]
    pub root_volume_size: Option<String>,
    #[serde(rename = "AWS_DEFAULT_REGION", default, deserialize_with = "scalar_string")]
    pub aws_default_region: Option<String>,
    #[serde(rename = "USER_EMAIL", default, deserialize_with = "scalar_string")]
    pub user_email: Option<String>,
    #[serde(rename = "USER_TEAM", default, deserialize_with = "scalar_string")]
    pub user_team: Option<String>,
    #[serde(rename = "USER_USAGE", default, deserialize_with = "scalar_string")]
    pub user_usage: Option<String>,
    #[serde(rename = "USER_USAGE_DESCRIPTION", default, deserialize_with = "scalar_string")]
    pub user_usage_description: Option<String>,

    /// Raw install-config template used instead of the one on disk
    #[serde(rename = "installConfigOverride", default, deserialize_with = "scalar_string")]
    pub install_config_override: Option<String>,

    /// Run `oc apply` with `--dry-run=server`
    #[serde(rename = "dryRun", default, deserialize_with = "truthy")]
    pub dry_run: bool,
}

impl ProvisioningRequest {
    /// Look up a template-visible field by its variable name
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "AWS_ACCESS_KEY_ID" => &self.aws_access_key_id,
            "AWS_SECRET_ACCESS_KEY" => &self.aws_secret_access_key,
            "GUID" => &self.guid,
            "ROADSHOW" => &self.roadshow,
            "BASE_DOMAIN" => &self.base_domain,
            "PULL_SECRET" => &self.pull_secret,
            "SSH_PUBLIC_KEY" => &self.ssh_public_key,
            "INSTANCE_TYPE" => &self.instance_type,
            "ROOT_VOLUME_SIZE" => &self.root_volume_size,
            "AWS_DEFAULT_REGION" => &self.aws_default_region,
            "USER_EMAIL" => &self.user_email,
            "USER_TEAM" => &self.user_team,
            "USER_USAGE" => &self.user_usage,
            "USER_USAGE_DESCRIPTION" => &self.user_usage_description,
            _ => return None,
        };
        value.as_deref()
    }

    /// Build the substitution variables for the install-config template
    ///
    /// `PULL_SECRET` is replaced by the canonical serialization of the parsed secret.
    pub fn template_variables<'a>(
        &'a self,
        canonical_pull_secret: &'a str,
    ) -> HashMap<&'static str, Option<&'a str>> {
        REQUIRED_FIELDS
            .iter()
            .chain(OPTIONAL_FIELDS.iter())
            .map(|name| {
                let value = if *name == "PULL_SECRET" {
                    Some(canonical_pull_secret)
                } else {
                    self.field(name)
                };
                (*name, value)
            })
            .collect()
    }

    /// The template override, if it contains anything but whitespace
    pub fn template_override(&self) -> Option<&str> {
        self.install_config_override
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

impl std::fmt::Debug for ProvisioningRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let present: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .chain(OPTIONAL_FIELDS.iter())
            .copied()
            .filter(|name| self.field(name).is_some())
            .collect();
        f.debug_struct("ProvisioningRequest")
            .field("present_fields", &present)
            .field("has_override", &self.template_override().is_some())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Accept any JSON scalar as a string; `null` is treated as absent
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Interpret booleans, non-zero numbers and "true"/"1"/"yes" strings as set
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => {
            matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
        }
        _ => false,
    })
}
