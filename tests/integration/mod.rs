//! Integration tests for the variable engine
//!
//! Shared setup for the facade-level tests.

pub mod export_import_test;
pub mod manager_workflow_test;
pub mod scope_resolution_test;

use rest_variables::config::EngineConfig;
use rest_variables::manager::VariableManager;
use rest_variables::models::{EnvironmentScope, ScopeType};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Manager with default configuration and logging set up.
pub fn new_manager() -> VariableManager {
    init_test_env();
    VariableManager::new(EngineConfig::default())
}

/// Creates a global scope plus a collection scope owned by `collection_id`.
pub fn global_and_collection(
    manager: &mut VariableManager,
    collection_id: &str,
) -> (EnvironmentScope, EnvironmentScope) {
    let global = manager.create_scope("Globals", ScopeType::Global, None, None);
    let collection = manager.create_scope(
        "Collection",
        ScopeType::Collection,
        Some(collection_id.to_string()),
        None,
    );
    (global, collection)
}
