//! Configuration loading for the variable engine.
//!
//! Settings are read from the "variables" key of a host settings blob and
//! merged with defaults. The resulting [`EngineConfig`] is owned by the
//! [`crate::manager::VariableManager`] rather than kept in a global.

pub mod schema;

pub use schema::{ConfigUpdate, EngineConfig};

use crate::error::{Result, VariableError};
use log::warn;
use serde_json::Value;

/// Key the engine's settings live under in the host settings object.
pub const SETTINGS_KEY: &str = "variables";

/// Loads configuration from a settings JSON value.
///
/// Malformed settings are logged and replaced by defaults; settings that parse
/// but fail validation are an error.
///
/// # Example
///
/// ```
/// use rest_variables::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "variables": {
///         "maxVariables": 200,
///         "autoComplete": false
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.max_variables, 200);
/// assert!(!config.auto_complete);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<EngineConfig> {
    let mut config = EngineConfig::default();

    if let Some(settings) = settings_json {
        if let Some(section) = settings.get(SETTINGS_KEY) {
            match serde_json::from_value::<EngineConfig>(section.clone()) {
                Ok(user_config) => config = user_config,
                Err(e) => {
                    warn!("Failed to parse {} settings: {}. Using defaults.", SETTINGS_KEY, e);
                }
            }
        }
    }

    config.validate().map_err(VariableError::InvalidConfig)?;
    Ok(config)
}
