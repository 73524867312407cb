//! Variable export.
//!
//! Serializes a snapshot of variables to JSON, dotenv (`KEY=value`) or CSV
//! text. Writing the text anywhere (file, clipboard, download) is left to the
//! caller. The matching parsers live in [`import`].

pub mod import;

pub use import::{import_variables, ImportSummary};

use crate::error::Result;
use crate::models::{EnvironmentVariable, ScopeType, VariableType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema version written into JSON exports.
pub const EXPORT_SCHEMA_VERSION: &str = "1.0";

/// Header row of CSV exports.
pub const CSV_HEADER: &str = "Key,Value,Type,Scope,Description,Enabled";

/// Supported text formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Env,
    Csv,
}

impl ExportFormat {
    /// Conventional file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Env => "env",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Env => "text/plain",
            ExportFormat::Csv => "text/csv",
        }
    }
}

/// Options for [`export_variables`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Only export variables of this scope type
    pub scope: Option<ScopeType>,
    /// When false, `secret` variables are left out
    pub include_secrets: bool,
    /// Written as `exportedAt` in JSON exports
    pub timestamp: DateTime<Utc>,
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            scope: None,
            include_secrets: false,
            timestamp: Utc::now(),
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new(ExportFormat::default())
    }
}

/// A variable as it appears in a JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedVariable {
    pub key: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub var_type: VariableType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeType>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl From<&EnvironmentVariable> for ExportedVariable {
    fn from(var: &EnvironmentVariable) -> Self {
        Self {
            key: var.key.clone(),
            value: var.value.clone(),
            var_type: var.var_type,
            scope: Some(var.scope),
            description: var.description.clone(),
            enabled: var.enabled,
        }
    }
}

/// Top-level JSON export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub variables: Vec<ExportedVariable>,
}

/// Serializes `variables` according to `options`.
///
/// # Arguments
///
/// * `variables` - Snapshot to export, in the order it should be written
/// * `options` - Format, scope filter, secret handling and timestamp
///
/// # Returns
///
/// The export text, or `Err(Serialization)` if JSON encoding fails.
pub fn export_variables(variables: &[EnvironmentVariable], options: &ExportOptions) -> Result<String> {
    let selected: Vec<&EnvironmentVariable> = variables
        .iter()
        .filter(|v| options.scope.map_or(true, |scope| v.scope == scope))
        .filter(|v| options.include_secrets || !v.is_secret())
        .collect();

    match options.format {
        ExportFormat::Json => export_json(&selected, options.timestamp),
        ExportFormat::Env => Ok(export_env(&selected)),
        ExportFormat::Csv => Ok(export_csv(&selected)),
    }
}

fn export_json(variables: &[&EnvironmentVariable], timestamp: DateTime<Utc>) -> Result<String> {
    let document = ExportDocument {
        version: EXPORT_SCHEMA_VERSION.to_string(),
        exported_at: timestamp,
        variables: variables.iter().map(|v| ExportedVariable::from(*v)).collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// `KEY=value` lines with raw values. Not reversible for values wrapped in
/// quotes; see [`import`].
fn export_env(variables: &[&EnvironmentVariable]) -> String {
    variables
        .iter()
        .map(|v| format!("{}={}", v.key, v.value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn export_csv(variables: &[&EnvironmentVariable]) -> String {
    let mut lines = Vec::with_capacity(variables.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for v in variables {
        let fields = [
            v.key.as_str(),
            v.value.as_str(),
            v.var_type.as_str(),
            v.scope.as_str(),
            v.description.as_deref().unwrap_or(""),
            if v.enabled { "true" } else { "false" },
        ];
        let row: Vec<String> = fields.iter().map(|f| quote_csv(f)).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Wraps a field in double quotes, doubling embedded quotes.
fn quote_csv(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
