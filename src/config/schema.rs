//! Configuration schema for the variable engine.
//!
//! This module defines the settings structure, its defaults and validation.

use serde::{Deserialize, Serialize};

/// Engine settings.
///
/// Loaded from the host's settings under the "variables" key. Missing
/// settings fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Maximum number of variables across all scopes.
    ///
    /// `add_variable` and imports are rejected once the store holds this many
    /// variables. Defaults to 1000.
    ///
    /// Must be > 0.
    #[serde(default = "default_max_variables")]
    pub max_variables: usize,

    /// Whether `{{$name}}` tokens resolve from the system catalog.
    ///
    /// When disabled they are reported as unresolved. Defaults to true.
    #[serde(default = "default_enable_system_variables")]
    pub enable_system_variables: bool,

    /// Whether variable suggestions are offered while typing.
    ///
    /// Defaults to true.
    #[serde(default = "default_auto_complete")]
    pub auto_complete: bool,
}

/// Partial settings update. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    #[serde(default)]
    pub max_variables: Option<usize>,
    #[serde(default)]
    pub enable_system_variables: Option<bool>,
    #[serde(default)]
    pub auto_complete: Option<bool>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_variables: default_max_variables(),
            enable_system_variables: default_enable_system_variables(),
            auto_complete: default_auto_complete(),
        }
    }
}

impl EngineConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive message.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_variables == 0 {
            return Err("maxVariables must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Shallow-merges `update` over this configuration.
    ///
    /// The result is not validated; callers decide what to do with an
    /// invalid merge.
    pub fn merge(&self, update: &ConfigUpdate) -> Self {
        Self {
            max_variables: update.max_variables.unwrap_or(self.max_variables),
            enable_system_variables: update
                .enable_system_variables
                .unwrap_or(self.enable_system_variables),
            auto_complete: update.auto_complete.unwrap_or(self.auto_complete),
        }
    }
}

// Default value functions for serde

fn default_max_variables() -> usize {
    1000
}

fn default_enable_system_variables() -> bool {
    true
}

fn default_auto_complete() -> bool {
    true
}
