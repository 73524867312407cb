//! Variable validation.
//!
//! Pure checks over a [`VariableDraft`]. Nothing here mutates state; the store
//! runs the same rules before inserting and turns the first error into a
//! [`VariableError`].

use crate::error::VariableError;
use crate::models::VariableDraft;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Compiled once: a key starts with a letter or underscore, then letters,
/// digits or underscores.
static KEY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Failed to compile key regex"));

/// Outcome of validating a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Checks whether `key` is a well-formed variable key.
///
/// # Example
///
/// ```
/// use rest_variables::validation::is_valid_key;
///
/// assert!(is_valid_key("_ok1"));
/// assert!(!is_valid_key("123bad"));
/// assert!(!is_valid_key("bad-key"));
/// ```
pub fn is_valid_key(key: &str) -> bool {
    KEY_REGEX.is_match(key)
}

/// Validates a variable draft.
///
/// Errors: the key is blank, or the key is malformed.
/// Warnings: the value was never supplied (`None`). An empty string is fine.
pub fn validate_variable(draft: &VariableDraft) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Err(err) = check_key(&draft.key) {
        errors.push(err.to_string());
    }

    if draft.value.is_none() {
        warnings.push(format!("Variable '{}' has no value", draft.key));
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Applies the key rules and returns the typed error for the first failure.
///
/// A blank key is `EmptyKey`. Anything else is matched as given, so
/// surrounding whitespace makes the key invalid.
pub(crate) fn check_key(key: &str) -> Result<(), VariableError> {
    if key.trim().is_empty() {
        return Err(VariableError::EmptyKey);
    }
    if !is_valid_key(key) {
        return Err(VariableError::InvalidKey(key.to_string()));
    }
    Ok(())
}
