//! Error types for variable management.
//!
//! Only the "hard" failures live here: rejected inserts, malformed keys,
//! invalid configuration and parse failures. Lookups and updates against an
//! unknown id are soft failures and surface as `bool` / `Option` instead.

use thiserror::Error;

/// Errors that can occur while managing scopes and variables.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VariableError {
    /// The variable key is missing or blank
    #[error("Variable key is required")]
    EmptyKey,

    /// The variable key does not match `^[A-Za-z_][A-Za-z0-9_]*$`
    #[error("Invalid variable key '{0}': must start with a letter or underscore and contain only letters, digits and underscores")]
    InvalidKey(String),

    /// A variable with the same key already exists in the target scope
    #[error("Variable '{key}' already exists in scope {scope_id}")]
    DuplicateKey { key: String, scope_id: String },

    /// The referenced scope does not exist
    #[error("Scope not found: {0}")]
    ScopeNotFound(String),

    /// Adding the variable would exceed the configured capacity
    #[error("Variable limit reached: at most {max} variables are allowed")]
    CapacityExceeded { max: usize },

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serializing an export failed
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Import text could not be parsed
    #[error("Import parse error on line {line}: {message}")]
    ImportParse { line: usize, message: String },

    /// A shared session lock was poisoned by a panicking writer
    #[error("Variable session lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for VariableError {
    fn from(err: serde_json::Error) -> Self {
        VariableError::Serialization(err.to_string())
    }
}

/// Result alias for fallible variable operations.
pub type Result<T> = std::result::Result<T, VariableError>;
