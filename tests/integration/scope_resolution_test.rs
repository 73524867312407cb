//! Scope precedence and template resolution through the facade

use super::{global_and_collection, new_manager};
use regex::Regex;
use rest_variables::models::{ScopeType, VariableDraft, VariableUpdate};
use rest_variables::variables::{ResolutionContext, VariableSource};

#[test]
fn test_global_variable_resolves() {
    let mut manager = new_manager();
    let global = manager.create_scope("Globals", ScopeType::Global, None, None);
    manager
        .add_variable(&global.id, VariableDraft::new("GLOBAL_VAR", "global_value"))
        .unwrap();

    let result = manager.resolve_string("{{GLOBAL_VAR}}", None);
    assert_eq!(result.resolved, "global_value");
    assert!(result.unresolved.is_empty());
    assert_eq!(result.variables.len(), 1);
    assert_eq!(result.variables[0].scope, VariableSource::Global);
}

#[test]
fn test_collection_overrides_global_until_disabled() {
    let mut manager = new_manager();
    let (global, collection) = global_and_collection(&mut manager, "col-1");
    manager
        .add_variable(&global.id, VariableDraft::new("OVERRIDE_VAR", "global_original"))
        .unwrap();
    let overriding = manager
        .add_variable(
            &collection.id,
            VariableDraft::new("OVERRIDE_VAR", "collection_override"),
        )
        .unwrap();

    let ctx = ResolutionContext::collection("col-1");
    let result = manager.resolve_string("{{OVERRIDE_VAR}}", Some(&ctx));
    assert_eq!(result.resolved, "collection_override");
    assert_eq!(result.variables[0].scope, VariableSource::Collection);

    assert!(manager
        .update_variable(&collection.id, &overriding.id, VariableUpdate::enabled(false))
        .unwrap());

    let result = manager.resolve_string("{{OVERRIDE_VAR}}", Some(&ctx));
    assert_eq!(result.resolved, "global_original");
    assert_eq!(result.variables[0].scope, VariableSource::Global);
}

#[test]
fn test_collection_scope_ignored_without_context() {
    let mut manager = new_manager();
    let (global, collection) = global_and_collection(&mut manager, "col-1");
    manager.add_variable(&global.id, VariableDraft::new("env", "global")).unwrap();
    manager
        .add_variable(&collection.id, VariableDraft::new("env", "collection"))
        .unwrap();

    assert_eq!(manager.resolve_string("{{env}}", None).resolved, "global");

    let other = ResolutionContext::collection("col-2");
    assert_eq!(manager.resolve_string("{{env}}", Some(&other)).resolved, "global");
}

#[test]
fn test_request_scope_precedence() {
    let mut manager = new_manager();
    let global = manager.create_scope("Globals", ScopeType::Global, None, None);
    let request = manager.create_scope("Login", ScopeType::Request, None, Some("req-1".to_string()));
    manager.add_variable(&global.id, VariableDraft::new("user", "guest")).unwrap();
    manager.add_variable(&request.id, VariableDraft::new("user", "admin")).unwrap();

    let ctx = ResolutionContext::request("req-1");
    let result = manager.resolve_string("login as {{ user }}", Some(&ctx));
    assert_eq!(result.resolved, "login as admin");
    assert_eq!(result.variables[0].scope, VariableSource::Request);
}

#[test]
fn test_missing_variable_left_in_place() {
    let mut manager = new_manager();
    let global = manager.create_scope("Globals", ScopeType::Global, None, None);
    manager.add_variable(&global.id, VariableDraft::new("A", "alpha")).unwrap();

    let result = manager.resolve_string("{{A}}/{{MISSING}}", None);
    assert_eq!(result.resolved, "alpha/{{MISSING}}");
    assert_eq!(result.unresolved, vec!["MISSING".to_string()]);
    assert!(!result.is_complete());
}

#[test]
fn test_keys_are_case_sensitive() {
    let mut manager = new_manager();
    let global = manager.create_scope("Globals", ScopeType::Global, None, None);
    manager.add_variable(&global.id, VariableDraft::new("API_KEY", "upper")).unwrap();
    manager.add_variable(&global.id, VariableDraft::new("api_key", "lower")).unwrap();

    assert!(manager
        .add_variable(&global.id, VariableDraft::new("API_KEY", "again"))
        .is_err());

    let result = manager.resolve_string("{{API_KEY}} {{api_key}} {{Api_Key}}", None);
    assert_eq!(result.resolved, "upper lower {{Api_Key}}");
    assert_eq!(result.unresolved, vec!["Api_Key".to_string()]);
}

#[test]
fn test_key_grammar_enforced() {
    let mut manager = new_manager();
    let global = manager.create_scope("Globals", ScopeType::Global, None, None);

    assert!(manager.add_variable(&global.id, VariableDraft::new("123bad", "x")).is_err());
    assert!(manager.add_variable(&global.id, VariableDraft::new("bad-key", "x")).is_err());
    assert!(manager.add_variable(&global.id, VariableDraft::new("_ok1", "x")).is_ok());
}

#[test]
fn test_system_variables_resolve() {
    let manager = new_manager();

    let timestamp = manager.resolve_string("{{$timestamp}}", None).resolved;
    assert!(Regex::new(r"^\d+$").unwrap().is_match(&timestamp));

    let uuid_re =
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap();
    for token in ["{{$randomUUID}}", "{{$guid}}"] {
        let value = manager.resolve_string(token, None).resolved;
        assert_eq!(value.len(), 36);
        assert!(uuid_re.is_match(&value), "{} gave {}", token, value);
    }

    let port: u32 = manager
        .resolve_string("{{$randomPort}}", None)
        .resolved
        .parse()
        .unwrap();
    assert!(port > 0 && port <= 65535);

    let result = manager.resolve_string("{{$nope}}", None);
    assert_eq!(result.resolved, "{{$nope}}");
    assert_eq!(result.unresolved, vec!["$nope".to_string()]);
}

#[test]
fn test_each_system_placeholder_is_fresh() {
    let manager = new_manager();
    let result = manager.resolve_string("{{$randomUUID}} {{$randomUUID}}", None);
    let parts: Vec<&str> = result.resolved.split(' ').collect();
    assert_eq!(parts.len(), 2);
    assert_ne!(parts[0], parts[1]);
    assert!(result.variables.iter().all(|v| v.scope == VariableSource::System));
}

#[test]
fn test_resolved_values_are_not_rescanned() {
    let mut manager = new_manager();
    let global = manager.create_scope("Globals", ScopeType::Global, None, None);
    manager.add_variable(&global.id, VariableDraft::new("outer", "{{inner}}")).unwrap();
    manager.add_variable(&global.id, VariableDraft::new("inner", "value")).unwrap();

    let result = manager.resolve_string("{{outer}}", None);
    assert_eq!(result.resolved, "{{inner}}");
    assert!(result.is_complete());
}

#[test]
fn test_exactly_one_active_scope() {
    let mut manager = new_manager();
    let ids: Vec<String> = (0..4)
        .map(|i| {
            let scope_type = if i % 2 == 0 { ScopeType::Global } else { ScopeType::Collection };
            manager
                .create_scope(format!("Scope {}", i), scope_type, Some(format!("col-{}", i)), None)
                .id
        })
        .collect();

    for id in ids.iter().chain(ids.iter().rev()).chain([&ids[2], &ids[2]]) {
        assert!(manager.set_active_scope(id));
        let active: Vec<_> = manager
            .get_scopes(None, None)
            .into_iter()
            .filter(|s| s.is_active)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(&active[0].id, id);
        assert_eq!(manager.get_active_scope().map(|s| s.id.as_str()), Some(id.as_str()));
    }

    assert!(manager.delete_scope(&ids[2]));
    assert!(manager.get_active_scope().is_none());
}
