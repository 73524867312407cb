//! Variable data models.

use super::scope::ScopeType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display and export hint for a variable value.
///
/// `Secret` only affects how a value is shown and whether it is exported;
/// the value itself is stored in plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    Text,
    Secret,
}

impl VariableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::Text => "text",
            VariableType::Secret => "secret",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(VariableType::Text),
            "secret" => Some(VariableType::Secret),
            _ => None,
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single key/value pair owned by a scope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentVariable {
    /// Unique identifier within the owning scope (UUID v4)
    pub id: String,

    /// Placeholder name, matching `^[A-Za-z_][A-Za-z0-9_]*$`
    pub key: String,

    /// Substituted value, may be empty
    pub value: String,

    #[serde(rename = "type", default)]
    pub var_type: VariableType,

    /// Copy of the owning scope's type, kept in sync by the store
    pub scope: ScopeType,

    /// Disabled variables are listed but never used for resolution
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

impl EnvironmentVariable {
    /// Builds a stored variable from a validated draft.
    pub(crate) fn from_draft(draft: VariableDraft, scope: ScopeType) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            key: draft.key,
            value: draft.value.unwrap_or_default(),
            var_type: draft.var_type,
            scope,
            enabled: draft.enabled,
            description: draft.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true when the variable is marked `secret`.
    pub fn is_secret(&self) -> bool {
        self.var_type == VariableType::Secret
    }

    /// Value suitable for display: secrets are masked.
    pub fn display_value(&self) -> String {
        if self.is_secret() {
            "*".repeat(self.value.chars().count().clamp(1, 8))
        } else {
            self.value.clone()
        }
    }
}

/// Input for creating a variable.
///
/// `value: None` models a value that was never supplied; validation warns
/// about it but still accepts the draft. An empty string is a legitimate value.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDraft {
    pub key: String,
    pub value: Option<String>,
    pub var_type: VariableType,
    pub enabled: bool,
    pub description: Option<String>,
}

impl VariableDraft {
    /// Creates an enabled text variable draft.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            var_type: VariableType::Text,
            enabled: true,
            description: None,
        }
    }

    /// Creates an enabled secret variable draft.
    pub fn secret(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            var_type: VariableType::Secret,
            ..Self::new(key, value)
        }
    }

    /// Draft without a value.
    pub fn without_value(key: impl Into<String>) -> Self {
        Self {
            value: None,
            ..Self::new(key, "")
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update applied by [`crate::store::VariableStore::update_variable`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableUpdate {
    pub key: Option<String>,
    pub value: Option<String>,
    pub var_type: Option<VariableType>,
    pub enabled: Option<bool>,
    pub description: Option<String>,
}

impl VariableUpdate {
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
