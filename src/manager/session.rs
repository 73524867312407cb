//! Shared, thread-safe handle to a [`VariableManager`].

use super::VariableManager;
use crate::config::EngineConfig;
use crate::error::{Result, VariableError};
use crate::models::{EnvironmentScope, VariableDraft};
use crate::variables::{ResolutionContext, ResolutionResult};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable session over one manager.
///
/// Clones share the same manager. Resolution takes a read lock, so many
/// resolvers can run concurrently while edits are serialized.
#[derive(Debug, Clone)]
pub struct VariableSession {
    inner: Arc<RwLock<VariableManager>>,
}

impl Default for VariableSession {
    fn default() -> Self {
        Self::new(VariableManager::default())
    }
}

impl VariableSession {
    pub fn new(manager: VariableManager) -> Self {
        Self {
            inner: Arc::new(RwLock::new(manager)),
        }
    }

    /// Runs `f` with shared access to the manager.
    pub fn read<T>(&self, f: impl FnOnce(&VariableManager) -> T) -> Result<T> {
        let guard = self.read_guard()?;
        Ok(f(&guard))
    }

    /// Runs `f` with exclusive access to the manager.
    pub fn write<T>(&self, f: impl FnOnce(&mut VariableManager) -> T) -> Result<T> {
        let mut guard = self.write_guard()?;
        Ok(f(&mut guard))
    }

    pub fn resolve_string(
        &self,
        template: &str,
        context: Option<&ResolutionContext>,
    ) -> Result<ResolutionResult> {
        self.read(|manager| manager.resolve_string(template, context))
    }

    pub fn active_scope(&self) -> Result<Option<EnvironmentScope>> {
        self.read(|manager| manager.get_active_scope().cloned())
    }

    pub fn set_active_scope(&self, id: &str) -> Result<bool> {
        self.write(|manager| manager.set_active_scope(id))
    }

    /// Adds a variable; flattens lock and store errors into one result.
    pub fn add_variable(&self, scope_id: &str, draft: VariableDraft) -> Result<String> {
        self.write(|manager| manager.add_variable(scope_id, draft).map(|v| v.id))?
    }

    pub fn configuration(&self) -> Result<EngineConfig> {
        self.read(|manager| manager.get_configuration().clone())
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, VariableManager>> {
        self.inner.read().map_err(|_| VariableError::LockPoisoned)
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, VariableManager>> {
        self.inner.write().map_err(|_| VariableError::LockPoisoned)
    }
}
