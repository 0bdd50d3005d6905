// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// What to do when the prior and proposed values are of different variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Keep the proposed value silently.
    Ignore,
    /// Keep the proposed value and report a warning.
    Warn,
    /// Keep the proposed value and report an error.
    #[default]
    Error,
}

/// Reconciler configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub variant_mismatch: MismatchPolicy,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Config> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Config> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}
