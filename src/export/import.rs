//! Parsing of exported variable text.
//!
//! Reads the three export formats back into [`VariableDraft`]s. The target
//! scope is chosen by the caller, so any `scope` column in the input is
//! ignored.
//!
//! The env format is lossy. Export writes values raw, and import strips one
//! pair of surrounding quotes, so a value that is itself quoted (`"abc"`)
//! comes back as `abc`. Use JSON or CSV when values must survive exactly.

use super::{ExportDocument, ExportFormat, CSV_HEADER};
use crate::error::{Result, VariableError};
use crate::models::{VariableDraft, VariableType};
use serde::Serialize;

/// Outcome of importing variables into a scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
    /// Per-variable rejections (invalid keys and the like)
    pub errors: Vec<String>,
}

/// Parses export text into drafts, in input order.
///
/// # Errors
///
/// `ImportParse` with the offending line number when the text is not valid
/// for `format`. Key validity is not checked here; that happens on insert.
pub fn import_variables(text: &str, format: ExportFormat) -> Result<Vec<VariableDraft>> {
    match format {
        ExportFormat::Json => import_json(text),
        ExportFormat::Env => import_env(text),
        ExportFormat::Csv => import_csv(text),
    }
}

fn import_json(text: &str) -> Result<Vec<VariableDraft>> {
    let document: ExportDocument =
        serde_json::from_str(text).map_err(|e| VariableError::ImportParse {
            line: e.line(),
            message: e.to_string(),
        })?;

    Ok(document
        .variables
        .into_iter()
        .map(|v| VariableDraft {
            key: v.key,
            value: Some(v.value),
            var_type: v.var_type,
            enabled: v.enabled,
            description: v.description.filter(|d| !d.is_empty()),
        })
        .collect())
}

fn import_env(text: &str) -> Result<Vec<VariableDraft>> {
    let mut drafts = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            return Err(VariableError::ImportParse {
                line: line_num + 1,
                message: format!("expected KEY=value, found '{}'", line),
            });
        };

        drafts.push(VariableDraft::new(key.trim(), strip_quotes(value.trim())));
    }

    Ok(drafts)
}

/// Removes one pair of matching surrounding quotes.
///
/// Applied to every env value, including ones whose quotes were part of the
/// exported value.
fn strip_quotes(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn import_csv(text: &str) -> Result<Vec<VariableDraft>> {
    let records = parse_csv(text)?;
    let mut records = records.into_iter();

    match records.next() {
        Some((_, header)) if header.join(",") == CSV_HEADER => {}
        Some((line, _)) => {
            return Err(VariableError::ImportParse {
                line,
                message: format!("expected header '{}'", CSV_HEADER),
            })
        }
        None => return Ok(Vec::new()),
    }

    let mut drafts = Vec::new();
    for (line, fields) in records {
        if fields.len() != 6 {
            return Err(VariableError::ImportParse {
                line,
                message: format!("expected 6 fields, found {}", fields.len()),
            });
        }

        let var_type = VariableType::from_str(&fields[2]).ok_or_else(|| VariableError::ImportParse {
            line,
            message: format!("unknown variable type '{}'", fields[2]),
        })?;
        let enabled = match fields[5].trim() {
            "true" => true,
            "false" => false,
            other => {
                return Err(VariableError::ImportParse {
                    line,
                    message: format!("invalid enabled flag '{}'", other),
                })
            }
        };

        let mut fields = fields.into_iter();
        let key = fields.next().unwrap_or_default();
        let value = fields.next().unwrap_or_default();
        let description = fields.nth(2).filter(|d| !d.is_empty());

        drafts.push(VariableDraft {
            key,
            value: Some(value),
            var_type,
            enabled,
            description,
        });
    }

    Ok(drafts)
}

/// Splits CSV text into records of fields, each tagged with its starting line.
///
/// Quoted fields may contain commas, newlines and doubled quotes. Blank lines
/// between records are skipped.
fn parse_csv(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                if !fields.is_empty() || !field.is_empty() {
                    fields.push(std::mem::take(&mut field));
                    records.push((record_line, std::mem::take(&mut fields)));
                }
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(VariableError::ImportParse {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !fields.is_empty() || !field.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }

    Ok(records)
}
