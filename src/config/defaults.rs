//! # Field Defaults
//!
//! Per-field default values offered to the UI by the defaults endpoint.

use crate::constants::DEFAULT_ROADSHOW;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Deref;
use zeroize::Zeroize;

/// Non-secret fields the UI may prefill
pub const DEFAULT_FIELDS: &[&str] = &[
    "GUID",
    "ROADSHOW",
    "BASE_DOMAIN",
    "INSTANCE_TYPE",
    "ROOT_VOLUME_SIZE",
    "AWS_DEFAULT_REGION",
    "USER_EMAIL",
    "USER_TEAM",
    "USER_USAGE",
    "USER_USAGE_DESCRIPTION",
];

/// Secret fields, only prefilled for authorized callers when prefill is enabled
pub const SECRET_FIELDS: &[&str] = &[
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "PULL_SECRET",
    "SSH_PUBLIC_KEY",
];

/// Default values for request fields
///
/// Missing values are stored as empty strings so the UI always receives every key.
#[derive(Clone, Default)]
pub struct FieldDefaults {
    fields: BTreeMap<String, String>,
    secrets: BTreeMap<String, String>,
}

impl FieldDefaults {
    /// Build defaults from an arbitrary lookup (environment, test fixture, ...)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let fields = DEFAULT_FIELDS
            .iter()
            .map(|key| {
                let fallback = if *key == "ROADSHOW" { DEFAULT_ROADSHOW } else { "" };
                (
                    (*key).to_string(),
                    value(key).unwrap_or_else(|| fallback.to_string()),
                )
            })
            .collect();

        let secrets = SECRET_FIELDS
            .iter()
            .map(|key| ((*key).to_string(), value(key).unwrap_or_default()))
            .collect();

        Self { fields, secrets }
    }

    /// Load defaults from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Non-secret defaults as an owned map
    pub fn without_secrets(&self) -> DefaultValues {
        DefaultValues(self.fields.clone())
    }

    /// Non-secret defaults merged with secret defaults
    pub fn with_secrets(&self) -> DefaultValues {
        let mut merged = self.fields.clone();
        merged.extend(self.secrets.iter().map(|(k, v)| (k.clone(), v.clone())));
        DefaultValues(merged)
    }
}

/// Owned copy of default values handed to a response; values are zeroized on drop
#[derive(Serialize)]
#[serde(transparent)]
pub struct DefaultValues(BTreeMap<String, String>);

impl Deref for DefaultValues {
    type Target = BTreeMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Zeroize for DefaultValues {
    fn zeroize(&mut self) {
        for value in self.0.values_mut() {
            value.zeroize();
        }
    }
}

impl Drop for DefaultValues {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl std::fmt::Debug for DefaultValues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DefaultValues")
            .field(&self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl std::fmt::Debug for FieldDefaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDefaults")
            .field("fields", &self.fields)
            .field("secrets", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Drop for FieldDefaults {
    fn drop(&mut self) {
        for value in self.secrets.values_mut() {
            value.zeroize();
        }
    }
}
