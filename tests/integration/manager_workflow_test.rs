//! End-to-end workflows across the facade: listings, configuration,
//! change events and shared sessions

use super::{global_and_collection, init_test_env, new_manager};
use rest_variables::config::{load_config, ConfigUpdate};
use rest_variables::error::VariableError;
use rest_variables::manager::{ChangeEvent, VariableManager, VariableSession};
use rest_variables::models::{ScopeType, ScopeUpdate, VariableDraft, VariableType, VariableUpdate};
use rest_variables::store::{SortDirection, SortField, VariableFilter, VariableSort};
use rest_variables::variables::ResolutionContext;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::thread;

#[test]
fn test_filter_by_scope_and_sort_by_key() {
    let mut manager = new_manager();
    let (global, collection) = global_and_collection(&mut manager, "col-1");
    for key in ["zeta", "alpha", "Mid", "beta"] {
        manager.add_variable(&global.id, VariableDraft::new(key, "g")).unwrap();
    }
    manager.add_variable(&collection.id, VariableDraft::new("aaa", "c")).unwrap();

    let filter = VariableFilter::scopes([ScopeType::Global]);
    let listed = manager.get_variables(Some(&filter), Some(VariableSort::by_key()));

    assert_eq!(listed.len(), 4);
    assert!(listed.iter().all(|v| v.scope == ScopeType::Global));
    let keys: Vec<&str> = listed.iter().map(|v| v.key.as_str()).collect();
    assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(keys, vec!["Mid", "alpha", "beta", "zeta"]);
}

#[test]
fn test_filter_combinations() {
    let mut manager = new_manager();
    let (global, collection) = global_and_collection(&mut manager, "col-1");
    manager.add_variable(&global.id, VariableDraft::new("apiUrl", "x")).unwrap();
    manager.add_variable(&global.id, VariableDraft::secret("apiToken", "x")).unwrap();
    manager
        .add_variable(&collection.id, VariableDraft::new("apiVersion", "2").disabled())
        .unwrap();

    let secrets = VariableFilter {
        var_type: [VariableType::Secret].into_iter().collect(),
        ..Default::default()
    };
    let listed = manager.get_variables(Some(&secrets), None);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].key, "apiToken");

    let disabled = VariableFilter {
        enabled: Some(false),
        ..Default::default()
    };
    assert_eq!(manager.get_variables(Some(&disabled), None)[0].key, "apiVersion");

    let owned = VariableFilter {
        collection_id: Some("col-1".to_string()),
        ..Default::default()
    };
    assert_eq!(manager.get_variables(Some(&owned), None).len(), 1);

    assert_eq!(manager.get_variables(Some(&VariableFilter::search("Url")), None).len(), 1);
    assert!(manager.get_variables(Some(&VariableFilter::search("url")), None).is_empty());

    let by_key_desc = VariableSort::new(SortField::Key, SortDirection::Desc);
    let keys: Vec<String> = manager
        .get_variables(None, Some(by_key_desc))
        .into_iter()
        .map(|v| v.key)
        .collect();
    assert_eq!(keys, vec!["apiVersion", "apiUrl", "apiToken"]);
}

#[test]
fn test_scope_retype_moves_variables() {
    let mut manager = new_manager();
    let scope = manager.create_scope("Users", ScopeType::Global, None, None);
    manager.add_variable(&scope.id, VariableDraft::new("page", "1")).unwrap();

    assert!(manager.update_scope(
        &scope.id,
        ScopeUpdate {
            scope_type: Some(ScopeType::Collection),
            collection_id: Some(Some("col-9".to_string())),
            ..Default::default()
        },
    ));

    let updated = manager.get_scope(&scope.id).unwrap();
    assert_eq!(updated.scope_type, ScopeType::Collection);
    assert!(updated.variables.iter().all(|v| v.scope == ScopeType::Collection));

    let ctx = ResolutionContext::collection("col-9");
    assert_eq!(manager.resolve_string("{{page}}", Some(&ctx)).resolved, "1");
    assert_eq!(manager.resolve_string("{{page}}", None).resolved, "{{page}}");
}

#[test]
fn test_rename_onto_existing_key_rejected() {
    let mut manager = new_manager();
    let scope = manager.create_scope("Globals", ScopeType::Global, None, None);
    manager.add_variable(&scope.id, VariableDraft::new("a", "1")).unwrap();
    let b = manager.add_variable(&scope.id, VariableDraft::new("b", "2")).unwrap();

    let rename = VariableUpdate {
        key: Some("a".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        manager.update_variable(&scope.id, &b.id, rename),
        Err(VariableError::DuplicateKey { .. })
    ));
    assert!(!manager
        .update_variable(&scope.id, "missing", VariableUpdate::value("x"))
        .unwrap());
}

#[test]
fn test_config_from_settings_drives_manager() {
    init_test_env();
    let config = load_config(Some(json!({
        "variables": { "maxVariables": 1, "enableSystemVariables": false }
    })))
    .unwrap();

    let mut manager = VariableManager::new(config);
    let scope = manager.create_scope("Globals", ScopeType::Global, None, None);
    manager.add_variable(&scope.id, VariableDraft::new("only", "1")).unwrap();
    assert_eq!(
        manager.add_variable(&scope.id, VariableDraft::new("more", "2")),
        Err(VariableError::CapacityExceeded { max: 1 })
    );
    assert_eq!(manager.resolve_string("{{$guid}}", None).resolved, "{{$guid}}");

    manager
        .update_configuration(ConfigUpdate {
            max_variables: Some(10),
            ..Default::default()
        })
        .unwrap();
    assert!(manager.add_variable(&scope.id, VariableDraft::new("more", "2")).is_ok());
    assert!(!manager.get_configuration().enable_system_variables);
}

#[test]
fn test_listener_sees_full_lifecycle() {
    let mut manager = new_manager();
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    manager.subscribe(move |event: &ChangeEvent| {
        let name = serde_json::to_value(event).unwrap()["type"]
            .as_str()
            .unwrap()
            .to_string();
        sink.lock().unwrap().push(name);
    });

    let scope = manager.create_scope("Globals", ScopeType::Global, None, None);
    manager.update_scope(&scope.id, ScopeUpdate::rename("Shared"));
    manager.set_active_scope(&scope.id);
    manager
        .import_variables(&scope.id, "A=1\nB=2", rest_variables::ExportFormat::Env, false)
        .unwrap();
    manager
        .update_configuration(ConfigUpdate {
            auto_complete: Some(false),
            ..Default::default()
        })
        .unwrap();
    manager.delete_scope(&scope.id);

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "scopeCreated",
            "scopeUpdated",
            "activeScopeChanged",
            "variableAdded",
            "variableAdded",
            "configurationUpdated",
            "scopeDeleted",
        ]
    );
}

#[test]
fn test_session_shared_across_threads() {
    init_test_env();
    let session = VariableSession::default();
    let scope_id = session
        .write(|m| m.create_scope("Globals", ScopeType::Global, None, None).id)
        .unwrap();

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let session = session.clone();
            let scope_id = scope_id.clone();
            thread::spawn(move || {
                session
                    .add_variable(&scope_id, VariableDraft::new(format!("var{}", i), i.to_string()))
                    .unwrap()
            })
        })
        .collect();
    for handle in writers {
        handle.join().unwrap();
    }

    let result = session
        .resolve_string("{{var0}}{{var1}}{{var2}}{{var3}}", None)
        .unwrap();
    assert_eq!(result.resolved, "0123");
    assert_eq!(session.read(|m| m.statistics().total).unwrap(), 4);
}
