//! Scope and variable facade.
//!
//! [`VariableManager`] is the single entry point the rest of an application
//! talks to. It owns a [`VariableStore`] and the [`EngineConfig`], runs
//! validation, resolution and export against them, and pushes a
//! [`ChangeEvent`] to every registered listener after each successful
//! mutation.
//!
//! # Example
//!
//! ```
//! use rest_variables::manager::VariableManager;
//! use rest_variables::models::{ScopeType, VariableDraft};
//! use rest_variables::variables::ResolutionContext;
//!
//! let mut manager = VariableManager::default();
//! let globals = manager.create_scope("Globals", ScopeType::Global, None, None);
//! let users = manager.create_scope("Users API", ScopeType::Collection, Some("col-1".to_string()), None);
//!
//! manager.add_variable(&globals.id, VariableDraft::new("baseUrl", "https://api.example.com")).unwrap();
//! manager.add_variable(&users.id, VariableDraft::new("version", "v2")).unwrap();
//!
//! let ctx = ResolutionContext::collection("col-1");
//! let result = manager.resolve_string("{{baseUrl}}/{{version}}/users", Some(&ctx));
//! assert_eq!(result.resolved, "https://api.example.com/v2/users");
//! ```

pub mod events;
pub mod session;

pub use events::{ChangeEvent, ChangeListener};
pub use session::VariableSession;

use crate::config::{ConfigUpdate, EngineConfig};
use crate::error::{Result, VariableError};
use crate::export::{self, ExportFormat, ExportOptions, ImportSummary};
use crate::models::{
    EnvironmentScope, EnvironmentVariable, ScopeType, ScopeUpdate, VariableDraft, VariableType,
    VariableUpdate,
};
use crate::store::{VariableFilter, VariableSort, VariableStore};
use crate::validation::{self, ValidationResult};
use crate::variables::{
    get_system_variables, precedence_chain, resolve_string, ResolutionContext, ResolutionResult,
    ResolveOptions, SystemVariable, VariableSource,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Autocomplete candidate returned by [`VariableManager::suggest_variables`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableSuggestion {
    pub key: String,
    /// Display value; secrets are masked, system variables show an example
    pub detail: String,
    pub source: VariableSource,
}

/// Counts over the current store contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableStatistics {
    pub scopes: usize,
    pub total: usize,
    pub enabled: usize,
    pub disabled: usize,
    pub secrets: usize,
    pub global: usize,
    pub collection: usize,
    pub request: usize,
}

/// Facade over the store, validator, resolver and export engine.
pub struct VariableManager {
    store: VariableStore,
    config: EngineConfig,
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl fmt::Debug for VariableManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableManager")
            .field("store", &self.store)
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for VariableManager {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl VariableManager {
    /// Creates a manager with an empty store.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_store(VariableStore::new(), config)
    }

    /// Creates a manager around an existing store.
    pub fn with_store(store: VariableStore, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            listeners: Vec::new(),
        }
    }

    /// Registers a listener notified after every successful mutation.
    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Read-only access to the underlying store.
    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    fn notify(&self, event: ChangeEvent) {
        for listener in &self.listeners {
            listener.on_change(&event);
        }
    }

    // ---------------------------------------------------------------------
    // Scopes
    // ---------------------------------------------------------------------

    /// Creates an empty, inactive scope and emits `ScopeCreated`.
    ///
    /// Owner ids that do not fit `scope_type` are dropped.
    pub fn create_scope(
        &mut self,
        name: impl Into<String>,
        scope_type: ScopeType,
        collection_id: Option<String>,
        request_id: Option<String>,
    ) -> EnvironmentScope {
        let scope = self.store.create_scope(name, scope_type, collection_id, request_id);
        self.notify(ChangeEvent::ScopeCreated {
            scope: scope.clone(),
        });
        scope
    }

    /// Gets a scope by id. `None` if it does not exist.
    pub fn get_scope(&self, id: &str) -> Option<&EnvironmentScope> {
        self.store.get_scope(id)
    }

    /// Lists scopes in creation order, optionally restricted by type and, for
    /// collection scopes, by owning collection.
    pub fn get_scopes(
        &self,
        scope_type: Option<ScopeType>,
        collection_id: Option<&str>,
    ) -> Vec<&EnvironmentScope> {
        self.store.get_scopes(scope_type, collection_id)
    }

    /// Applies a partial scope update and emits `ScopeUpdated`.
    ///
    /// # Returns
    ///
    /// `false` (soft failure, no event) if the scope does not exist.
    pub fn update_scope(&mut self, id: &str, update: ScopeUpdate) -> bool {
        if !self.store.update_scope(id, update) {
            return false;
        }
        if let Some(scope) = self.store.get_scope(id).cloned() {
            self.notify(ChangeEvent::ScopeUpdated { scope });
        }
        true
    }

    /// Deletes a scope with its variables and emits `ScopeDeleted`.
    ///
    /// Returns `false` (soft failure) if the scope does not exist.
    pub fn delete_scope(&mut self, id: &str) -> bool {
        if !self.store.delete_scope(id) {
            return false;
        }
        self.notify(ChangeEvent::ScopeDeleted {
            scope_id: id.to_string(),
        });
        true
    }

    /// Makes `id` the single active scope and emits `ActiveScopeChanged`.
    ///
    /// Returns `false` and leaves the active scope unchanged if `id` does not
    /// exist.
    pub fn set_active_scope(&mut self, id: &str) -> bool {
        let previous = self.store.get_active_scope().map(|s| s.id.clone());
        if !self.store.set_active_scope(id) {
            return false;
        }
        self.notify(ChangeEvent::ActiveScopeChanged {
            previous,
            current: id.to_string(),
        });
        true
    }

    /// The active scope, if one is set.
    pub fn get_active_scope(&self) -> Option<&EnvironmentScope> {
        self.store.get_active_scope()
    }

    // ---------------------------------------------------------------------
    // Variables
    // ---------------------------------------------------------------------

    /// Validates a draft without touching the store.
    pub fn validate_variable(&self, draft: &VariableDraft) -> ValidationResult {
        validation::validate_variable(draft)
    }

    /// Adds a variable to a scope.
    ///
    /// # Errors
    ///
    /// Everything [`VariableStore::add_variable`] rejects, in the same order,
    /// then `CapacityExceeded` when the store already holds `max_variables`.
    pub fn add_variable(&mut self, scope_id: &str, draft: VariableDraft) -> Result<EnvironmentVariable> {
        self.store.check_insert(scope_id, &draft.key)?;

        let max = self.config.max_variables;
        if self.store.variable_count() >= max {
            warn!("Rejected variable '{}': limit of {} reached", draft.key, max);
            return Err(VariableError::CapacityExceeded { max });
        }

        let variable = self.store.add_variable(scope_id, draft)?;
        self.notify(ChangeEvent::VariableAdded {
            scope_id: scope_id.to_string(),
            variable: variable.clone(),
        });
        Ok(variable)
    }

    /// Gets a variable by scope id and variable id. `None` if either is missing.
    pub fn get_variable(&self, scope_id: &str, variable_id: &str) -> Option<&EnvironmentVariable> {
        self.store.get_variable(scope_id, variable_id)
    }

    /// Applies a partial variable update and emits `VariableUpdated`.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - the variable was updated
    /// * `Ok(false)` - soft failure: the scope or variable does not exist
    /// * `Err` - hard failure: a supplied key is malformed (`EmptyKey` /
    ///   `InvalidKey`) or taken by another variable in the scope (`DuplicateKey`)
    pub fn update_variable(
        &mut self,
        scope_id: &str,
        variable_id: &str,
        update: VariableUpdate,
    ) -> Result<bool> {
        if !self.store.update_variable(scope_id, variable_id, update)? {
            return Ok(false);
        }
        if let Some(variable) = self.store.get_variable(scope_id, variable_id).cloned() {
            self.notify(ChangeEvent::VariableUpdated {
                scope_id: scope_id.to_string(),
                variable,
            });
        }
        Ok(true)
    }

    /// Deletes a variable and emits `VariableDeleted`.
    ///
    /// Returns `false` (soft failure) if the scope or variable does not exist.
    pub fn delete_variable(&mut self, scope_id: &str, variable_id: &str) -> bool {
        if !self.store.delete_variable(scope_id, variable_id) {
            return false;
        }
        self.notify(ChangeEvent::VariableDeleted {
            scope_id: scope_id.to_string(),
            variable_id: variable_id.to_string(),
        });
        true
    }

    /// Lists variables across every scope.
    ///
    /// # Arguments
    ///
    /// * `filter` - Criteria to keep; `None` keeps everything
    /// * `sort` - Order; `None` means `updatedAt desc`
    pub fn get_variables(
        &self,
        filter: Option<&VariableFilter>,
        sort: Option<VariableSort>,
    ) -> Vec<EnvironmentVariable> {
        self.store.get_variables(filter, sort)
    }

    // ---------------------------------------------------------------------
    // Resolution
    // ---------------------------------------------------------------------

    /// Resolves `{{...}}` placeholders, honouring `enableSystemVariables`.
    pub fn resolve_string(&self, template: &str, context: Option<&ResolutionContext>) -> ResolutionResult {
        let options = ResolveOptions {
            system_variables: self.config.enable_system_variables,
        };
        resolve_string(&self.store, template, context, options)
    }

    /// Catalog of `$` system variables.
    pub fn get_system_variables(&self) -> Vec<SystemVariable> {
        get_system_variables()
    }

    /// Autocomplete candidates whose key starts with `prefix`.
    ///
    /// Stored variables come from the precedence chain of `context`, so an
    /// overridden key is suggested once with its winning value. System
    /// variables are included while they are enabled. Returns nothing when
    /// `autoComplete` is off.
    pub fn suggest_variables(
        &self,
        prefix: &str,
        context: Option<&ResolutionContext>,
    ) -> Vec<VariableSuggestion> {
        if !self.config.auto_complete {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut suggestions: Vec<VariableSuggestion> = Vec::new();

        for scope in precedence_chain(&self.store, context) {
            for var in scope.variables.iter().filter(|v| v.enabled) {
                if var.key.starts_with(prefix) && seen.insert(var.key.clone()) {
                    suggestions.push(VariableSuggestion {
                        key: var.key.clone(),
                        detail: var.display_value(),
                        source: var.scope.into(),
                    });
                }
            }
        }

        if self.config.enable_system_variables {
            suggestions.extend(
                get_system_variables()
                    .into_iter()
                    .filter(|sv| sv.key.starts_with(prefix))
                    .map(|sv| VariableSuggestion {
                        key: sv.key.to_string(),
                        detail: sv.example.to_string(),
                        source: VariableSource::System,
                    }),
            );
        }

        suggestions.sort_by(|a, b| a.key.cmp(&b.key));
        suggestions
    }

    // ---------------------------------------------------------------------
    // Export / import
    // ---------------------------------------------------------------------

    /// Exports variables in store order.
    pub fn export_variables(&self, options: &ExportOptions) -> Result<String> {
        let variables: Vec<EnvironmentVariable> = self.store.iter_variables().cloned().collect();
        export::export_variables(&variables, options)
    }

    /// Imports variables from export text into a scope.
    ///
    /// Keys already present in the scope are updated when `overwrite` is set
    /// and skipped otherwise. Drafts the store rejects (bad keys, capacity)
    /// are listed in [`ImportSummary::errors`] without aborting the import.
    ///
    /// # Errors
    ///
    /// `ScopeNotFound` if the scope is missing, `ImportParse` if the text
    /// cannot be parsed at all.
    pub fn import_variables(
        &mut self,
        scope_id: &str,
        text: &str,
        format: ExportFormat,
        overwrite: bool,
    ) -> Result<ImportSummary> {
        if self.store.get_scope(scope_id).is_none() {
            return Err(VariableError::ScopeNotFound(scope_id.to_string()));
        }

        let drafts = export::import_variables(text, format)?;
        let mut summary = ImportSummary::default();

        for draft in drafts {
            let existing = self
                .store
                .get_scope(scope_id)
                .and_then(|s| s.find_by_key(&draft.key))
                .map(|v| v.id.clone());

            match existing {
                Some(variable_id) if overwrite => {
                    let update = VariableUpdate {
                        key: None,
                        value: draft.value,
                        var_type: Some(draft.var_type),
                        enabled: Some(draft.enabled),
                        description: draft.description,
                    };
                    match self.update_variable(scope_id, &variable_id, update) {
                        Ok(_) => summary.updated += 1,
                        Err(err) => summary.errors.push(err.to_string()),
                    }
                }
                Some(_) => summary.skipped += 1,
                None => {
                    let key = draft.key.clone();
                    match self.add_variable(scope_id, draft) {
                        Ok(_) => summary.added += 1,
                        Err(err) => {
                            warn!("Import skipped '{}': {}", key, err);
                            summary.errors.push(err.to_string());
                        }
                    }
                }
            }
        }

        info!(
            "Imported into scope {}: {} added, {} updated, {} skipped, {} errors",
            scope_id,
            summary.added,
            summary.updated,
            summary.skipped,
            summary.errors.len()
        );
        Ok(summary)
    }

    // ---------------------------------------------------------------------
    // Configuration and statistics
    // ---------------------------------------------------------------------

    /// Current engine configuration.
    pub fn get_configuration(&self) -> &EngineConfig {
        &self.config
    }

    /// Shallow-merges `update` into the configuration.
    ///
    /// An update that would make the configuration invalid is rejected and the
    /// current configuration is kept.
    pub fn update_configuration(&mut self, update: ConfigUpdate) -> Result<EngineConfig> {
        let merged = self.config.merge(&update);
        merged.validate().map_err(VariableError::InvalidConfig)?;

        if self.store.variable_count() > merged.max_variables {
            warn!(
                "Store holds {} variables, above the new limit of {}",
                self.store.variable_count(),
                merged.max_variables
            );
        }

        self.config = merged.clone();
        debug!("Configuration updated: {:?}", self.config);
        self.notify(ChangeEvent::ConfigurationUpdated {
            config: merged.clone(),
        });
        Ok(merged)
    }

    /// Counts variables by scope type, type and enabled state.
    pub fn statistics(&self) -> VariableStatistics {
        let mut stats = VariableStatistics {
            scopes: self.store.len(),
            ..Default::default()
        };

        for var in self.store.iter_variables() {
            stats.total += 1;
            if var.enabled {
                stats.enabled += 1;
            } else {
                stats.disabled += 1;
            }
            if var.var_type == VariableType::Secret {
                stats.secrets += 1;
            }
            match var.scope {
                ScopeType::Global => stats.global += 1,
                ScopeType::Collection => stats.collection += 1,
                ScopeType::Request => stats.request += 1,
            }
        }

        stats
    }
}
