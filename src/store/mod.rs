//! In-memory registry of scopes and their variables.
//!
//! Scopes live in an arena (`Vec`) with a `HashMap` index from id to arena
//! position, giving insertion-ordered iteration and O(1) lookup. The store owns
//! identity (ids, timestamps) and the single store-wide active pointer.
//!
//! Failure styles are split deliberately:
//!
//! - `add_variable` returns `Err` on a malformed or duplicate key (hard failure)
//! - lookups, updates and deletes against unknown ids return `None` / `false`
//!   (soft failure, callers routinely check for existence)

pub mod filter;

pub use filter::{sort_variables, SortDirection, SortField, VariableFilter, VariableSort};

use crate::error::{Result, VariableError};
use crate::models::{
    EnvironmentScope, EnvironmentVariable, ScopeType, ScopeUpdate, VariableDraft, VariableUpdate,
};
use crate::validation::check_key;
use chrono::Utc;
use log::{debug, warn};
use std::collections::HashMap;

/// Authoritative, mutable registry of scopes.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    scopes: Vec<EnvironmentScope>,
    index: HashMap<String, usize>,
    active: Option<String>,
}

impl VariableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Scopes
    // ---------------------------------------------------------------------

    /// Creates a new, empty, inactive scope and returns a copy of it.
    ///
    /// # Arguments
    ///
    /// * `name` - Display label
    /// * `scope_type` - Level the scope applies at
    /// * `collection_id` - Owning collection (kept only for `collection` scopes)
    /// * `request_id` - Owning request (kept only for `request` scopes)
    pub fn create_scope(
        &mut self,
        name: impl Into<String>,
        scope_type: ScopeType,
        collection_id: Option<String>,
        request_id: Option<String>,
    ) -> EnvironmentScope {
        let scope = EnvironmentScope::new(name, scope_type, collection_id, request_id);
        debug!("Created {} scope '{}' ({})", scope.scope_type, scope.name, scope.id);

        self.index.insert(scope.id.clone(), self.scopes.len());
        self.scopes.push(scope.clone());
        scope
    }

    /// Gets a scope by id.
    pub fn get_scope(&self, id: &str) -> Option<&EnvironmentScope> {
        self.index.get(id).map(|&pos| &self.scopes[pos])
    }

    fn get_scope_mut(&mut self, id: &str) -> Option<&mut EnvironmentScope> {
        match self.index.get(id) {
            Some(&pos) => Some(&mut self.scopes[pos]),
            None => None,
        }
    }

    /// Lists scopes in creation order.
    ///
    /// `scope_type` restricts by type. When the type is `collection` and a
    /// `collection_id` is given, only scopes owned by that collection are
    /// returned.
    pub fn get_scopes(
        &self,
        scope_type: Option<ScopeType>,
        collection_id: Option<&str>,
    ) -> Vec<&EnvironmentScope> {
        self.scopes
            .iter()
            .filter(|scope| scope_type.map_or(true, |t| scope.scope_type == t))
            .filter(|scope| match (scope_type, collection_id) {
                (Some(ScopeType::Collection), Some(id)) => scope.collection_id.as_deref() == Some(id),
                _ => true,
            })
            .collect()
    }

    /// Iterates over every scope in creation order.
    pub fn scopes(&self) -> impl Iterator<Item = &EnvironmentScope> {
        self.scopes.iter()
    }

    /// Applies a partial update to a scope.
    ///
    /// Returns `false` if the scope does not exist. When the scope type
    /// changes, every owned variable's `scope` field follows it.
    pub fn update_scope(&mut self, id: &str, update: ScopeUpdate) -> bool {
        let Some(scope) = self.get_scope_mut(id) else {
            return false;
        };

        if let Some(name) = update.name {
            scope.name = name;
        }
        if let Some(scope_type) = update.scope_type {
            scope.scope_type = scope_type;
            for variable in &mut scope.variables {
                variable.scope = scope_type;
            }
        }
        if let Some(collection_id) = update.collection_id {
            scope.collection_id = collection_id;
        }
        if let Some(request_id) = update.request_id {
            scope.request_id = request_id;
        }

        // Owner ids must keep matching the (possibly new) type
        if scope.scope_type != ScopeType::Collection {
            scope.collection_id = None;
        }
        if scope.scope_type != ScopeType::Request {
            scope.request_id = None;
        }

        scope.updated_at = Utc::now();
        debug!("Updated scope {}", id);
        true
    }

    /// Deletes a scope and every variable it owns.
    pub fn delete_scope(&mut self, id: &str) -> bool {
        let Some(pos) = self.index.remove(id) else {
            return false;
        };

        let removed = self.scopes.remove(pos);
        for (offset, scope) in self.scopes[pos..].iter().enumerate() {
            self.index.insert(scope.id.clone(), pos + offset);
        }

        if self.active.as_deref() == Some(id) {
            self.active = None;
        }

        debug!(
            "Deleted scope '{}' ({}) with {} variables",
            removed.name,
            id,
            removed.variables.len()
        );
        true
    }

    /// Makes `id` the single active scope.
    ///
    /// The previously active scope, whatever its type, is deactivated first.
    /// Returns `false` and changes nothing if `id` does not exist.
    pub fn set_active_scope(&mut self, id: &str) -> bool {
        if !self.index.contains_key(id) {
            return false;
        }

        if let Some(previous) = self.active.take() {
            if let Some(scope) = self.get_scope_mut(&previous) {
                scope.is_active = false;
            }
        }

        if let Some(scope) = self.get_scope_mut(id) {
            scope.is_active = true;
        }
        self.active = Some(id.to_string());
        debug!("Active scope is now {}", id);
        true
    }

    /// Gets the active scope, if any.
    pub fn get_active_scope(&self) -> Option<&EnvironmentScope> {
        self.active.as_deref().and_then(|id| self.get_scope(id))
    }

    // ---------------------------------------------------------------------
    // Variables
    // ---------------------------------------------------------------------

    /// Adds a variable to a scope.
    ///
    /// # Errors
    ///
    /// * `EmptyKey` / `InvalidKey` - the key fails validation
    /// * `ScopeNotFound` - no scope with `scope_id`
    /// * `DuplicateKey` - the scope already has a variable with this exact key,
    ///   enabled or not
    pub fn add_variable(&mut self, scope_id: &str, draft: VariableDraft) -> Result<EnvironmentVariable> {
        self.check_insert(scope_id, &draft.key)?;

        let scope = self
            .get_scope_mut(scope_id)
            .ok_or_else(|| VariableError::ScopeNotFound(scope_id.to_string()))?;

        let variable = EnvironmentVariable::from_draft(draft, scope.scope_type);
        debug!("Added variable '{}' to scope {}", variable.key, scope_id);
        scope.variables.push(variable.clone());
        scope.updated_at = variable.updated_at;
        Ok(variable)
    }

    /// Runs the insert checks of [`Self::add_variable`] without inserting:
    /// key rules, then scope existence, then key uniqueness.
    pub(crate) fn check_insert(&self, scope_id: &str, key: &str) -> Result<()> {
        if let Err(err) = check_key(key) {
            warn!("Rejected variable in scope {}: {}", scope_id, err);
            return Err(err);
        }

        let scope = self
            .get_scope(scope_id)
            .ok_or_else(|| VariableError::ScopeNotFound(scope_id.to_string()))?;

        if scope.find_by_key(key).is_some() {
            warn!("Rejected duplicate variable '{}' in scope {}", key, scope_id);
            return Err(VariableError::DuplicateKey {
                key: key.to_string(),
                scope_id: scope_id.to_string(),
            });
        }

        Ok(())
    }

    /// Gets a variable by scope id and variable id.
    pub fn get_variable(&self, scope_id: &str, variable_id: &str) -> Option<&EnvironmentVariable> {
        self.get_scope(scope_id)?
            .variables
            .iter()
            .find(|v| v.id == variable_id)
    }

    /// Applies a partial update to a variable.
    ///
    /// Returns `Ok(false)` if the scope or variable does not exist. Only the
    /// supplied fields are validated: a new key must be well-formed and must
    /// not collide with a *different* variable in the same scope.
    pub fn update_variable(
        &mut self,
        scope_id: &str,
        variable_id: &str,
        update: VariableUpdate,
    ) -> Result<bool> {
        let Some(scope) = self.get_scope_mut(scope_id) else {
            return Ok(false);
        };
        let Some(pos) = scope.variables.iter().position(|v| v.id == variable_id) else {
            return Ok(false);
        };

        let new_key = match update.key {
            Some(key) => {
                check_key(&key)?;
                let collides = scope
                    .variables
                    .iter()
                    .any(|v| v.id != variable_id && v.key == key);
                if collides {
                    return Err(VariableError::DuplicateKey {
                        key,
                        scope_id: scope_id.to_string(),
                    });
                }
                Some(key)
            }
            None => None,
        };

        let now = Utc::now();
        let variable = &mut scope.variables[pos];
        if let Some(key) = new_key {
            variable.key = key;
        }
        if let Some(value) = update.value {
            variable.value = value;
        }
        if let Some(var_type) = update.var_type {
            variable.var_type = var_type;
        }
        if let Some(enabled) = update.enabled {
            variable.enabled = enabled;
        }
        if let Some(description) = update.description {
            variable.description = Some(description);
        }
        variable.updated_at = now;
        scope.updated_at = now;

        debug!("Updated variable {} in scope {}", variable_id, scope_id);
        Ok(true)
    }

    /// Deletes a variable. The owning scope is left in place.
    pub fn delete_variable(&mut self, scope_id: &str, variable_id: &str) -> bool {
        let Some(scope) = self.get_scope_mut(scope_id) else {
            return false;
        };
        let before = scope.variables.len();
        scope.variables.retain(|v| v.id != variable_id);
        let removed = scope.variables.len() != before;
        if removed {
            scope.updated_at = Utc::now();
            debug!("Deleted variable {} from scope {}", variable_id, scope_id);
        }
        removed
    }

    /// Lists variables across all scopes, filtered and sorted.
    ///
    /// With no sort, the default order is `updatedAt desc`.
    pub fn get_variables(
        &self,
        filter: Option<&VariableFilter>,
        sort: Option<VariableSort>,
    ) -> Vec<EnvironmentVariable> {
        let mut variables: Vec<EnvironmentVariable> = self
            .scopes
            .iter()
            .flat_map(|scope| {
                scope
                    .variables
                    .iter()
                    .filter(move |v| filter.map_or(true, |f| f.matches(scope, v)))
            })
            .cloned()
            .collect();

        sort_variables(&mut variables, sort.unwrap_or_default());
        variables
    }

    /// Iterates over every variable in store order (scope creation order,
    /// then insertion order within a scope).
    pub fn iter_variables(&self) -> impl Iterator<Item = &EnvironmentVariable> {
        self.scopes.iter().flat_map(|scope| scope.variables.iter())
    }

    /// Total number of variables across every scope.
    pub fn variable_count(&self) -> usize {
        self.scopes.iter().map(|s| s.variables.len()).sum()
    }

    /// Number of scopes.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
