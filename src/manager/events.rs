//! Change notifications pushed to persistence adapters.
//!
//! The manager never persists anything itself. After every successful
//! mutation it emits a [`ChangeEvent`] to each registered [`ChangeListener`];
//! batching and storage are the listener's business.

use crate::config::EngineConfig;
use crate::models::{EnvironmentScope, EnvironmentVariable};
use serde::Serialize;

/// A successful mutation of the store or configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ChangeEvent {
    ScopeCreated { scope: EnvironmentScope },
    ScopeUpdated { scope: EnvironmentScope },
    ScopeDeleted { scope_id: String },
    ActiveScopeChanged {
        previous: Option<String>,
        current: String,
    },
    VariableAdded {
        scope_id: String,
        variable: EnvironmentVariable,
    },
    VariableUpdated {
        scope_id: String,
        variable: EnvironmentVariable,
    },
    VariableDeleted {
        scope_id: String,
        variable_id: String,
    },
    ConfigurationUpdated { config: EngineConfig },
}

impl ChangeEvent {
    /// Id of the scope the event concerns, if any.
    pub fn scope_id(&self) -> Option<&str> {
        match self {
            ChangeEvent::ScopeCreated { scope } | ChangeEvent::ScopeUpdated { scope } => Some(&scope.id),
            ChangeEvent::ScopeDeleted { scope_id }
            | ChangeEvent::VariableAdded { scope_id, .. }
            | ChangeEvent::VariableUpdated { scope_id, .. }
            | ChangeEvent::VariableDeleted { scope_id, .. } => Some(scope_id),
            ChangeEvent::ActiveScopeChanged { current, .. } => Some(current),
            ChangeEvent::ConfigurationUpdated { .. } => None,
        }
    }
}

/// Receives change events. Implemented by persistence adapters.
pub trait ChangeListener: Send + Sync {
    fn on_change(&self, event: &ChangeEvent);
}

impl<F> ChangeListener for F
where
    F: Fn(&ChangeEvent) + Send + Sync,
{
    fn on_change(&self, event: &ChangeEvent) {
        self(event)
    }
}
