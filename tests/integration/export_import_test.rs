//! Export and import through the facade

use super::{global_and_collection, new_manager};
use chrono::{TimeZone, Utc};
use rest_variables::export::{ExportFormat, ExportOptions, CSV_HEADER};
use rest_variables::manager::VariableManager;
use rest_variables::models::{ScopeType, VariableDraft};
use serde_json::Value;

fn populated_manager() -> VariableManager {
    let mut manager = new_manager();
    let (global, collection) = global_and_collection(&mut manager, "col-1");
    manager
        .add_variable(
            &global.id,
            VariableDraft::new("baseUrl", "https://api.example.com").with_description("API root"),
        )
        .unwrap();
    manager
        .add_variable(&global.id, VariableDraft::secret("apiKey", "s3cr3t"))
        .unwrap();
    manager
        .add_variable(&collection.id, VariableDraft::new("greeting", "say \"hi\", please"))
        .unwrap();
    manager
        .add_variable(&collection.id, VariableDraft::new("debug", "true").disabled())
        .unwrap();
    manager
}

#[test]
fn test_csv_export_excludes_secrets() {
    let manager = populated_manager();
    let csv = manager
        .export_variables(&ExportOptions::new(ExportFormat::Csv))
        .unwrap();

    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER));
    for line in lines {
        let columns: Vec<&str> = line.split("\",\"").collect();
        assert_ne!(columns[2], "secret", "secret row exported: {}", line);
    }
    assert!(!csv.contains("s3cr3t"));
    assert!(csv.contains(r#""greeting","say ""hi"", please","text","collection","","true""#));
    assert!(csv.contains(r#""debug","true","text","collection","","false""#));
}

#[test]
fn test_env_export_in_store_order() {
    let manager = populated_manager();
    let env = manager
        .export_variables(&ExportOptions {
            include_secrets: true,
            ..ExportOptions::new(ExportFormat::Env)
        })
        .unwrap();

    assert_eq!(
        env,
        "baseUrl=https://api.example.com\napiKey=s3cr3t\ngreeting=say \"hi\", please\ndebug=true"
    );
}

#[test]
fn test_json_export_document() {
    let manager = populated_manager();
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let json = manager
        .export_variables(&ExportOptions {
            scope: Some(ScopeType::Global),
            timestamp,
            ..ExportOptions::new(ExportFormat::Json)
        })
        .unwrap();

    let doc: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(doc["version"], "1.0");
    assert_eq!(doc["exportedAt"], "2024-01-02T03:04:05Z");

    let variables = doc["variables"].as_array().unwrap();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0]["key"], "baseUrl");
    assert_eq!(variables[0]["type"], "text");
    assert_eq!(variables[0]["scope"], "global");
    assert_eq!(variables[0]["description"], "API root");
    assert_eq!(variables[0]["enabled"], true);
}

#[test]
fn test_export_then_import_into_fresh_scope() {
    let source = populated_manager();

    let mut target = new_manager();
    let scope = target.create_scope("Imported", ScopeType::Global, None, None);

    for format in [ExportFormat::Json, ExportFormat::Csv] {
        let text = source
            .export_variables(&ExportOptions {
                include_secrets: true,
                ..ExportOptions::new(format)
            })
            .unwrap();

        let summary = target
            .import_variables(&scope.id, &text, format, true)
            .unwrap();
        assert!(summary.errors.is_empty(), "{:?}: {:?}", format, summary.errors);
        assert_eq!(summary.added + summary.updated, 4);
    }

    let result = target.resolve_string("{{baseUrl}} {{apiKey}} {{greeting}} {{debug}}", None);
    assert_eq!(
        result.resolved,
        "https://api.example.com s3cr3t say \"hi\", please {{debug}}"
    );
    assert_eq!(result.unresolved, vec!["debug".to_string()]);

    let stats = target.statistics();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.secrets, 1);
    assert_eq!(stats.disabled, 1);
}

#[test]
fn test_import_rejects_malformed_text() {
    let mut manager = new_manager();
    let scope = manager.create_scope("Globals", ScopeType::Global, None, None);

    assert!(manager
        .import_variables(&scope.id, "{ not json", ExportFormat::Json, false)
        .is_err());
    assert!(manager
        .import_variables(&scope.id, "Wrong,Header\n\"a\",\"b\"", ExportFormat::Csv, false)
        .is_err());
    assert_eq!(manager.statistics().total, 0);
}
