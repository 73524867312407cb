//! Filtering and sorting for variable listings.
//!
//! Filters are plain predicates applied in order, and sorting is stable so
//! equal keys keep their store order.

use crate::models::{EnvironmentScope, EnvironmentVariable, ScopeType, VariableType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Criteria for [`super::VariableStore::get_variables`].
///
/// Every field is optional; an empty set or `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableFilter {
    /// Keep variables whose scope type is in this set
    pub scope: HashSet<ScopeType>,

    /// Keep variables whose type is in this set
    pub var_type: HashSet<VariableType>,

    /// Keep only enabled (`true`) or only disabled (`false`) variables
    pub enabled: Option<bool>,

    /// Case-sensitive substring match on the key
    pub search_term: Option<String>,

    /// Keep variables owned by the collection scope with this collection id
    pub collection_id: Option<String>,
}

impl VariableFilter {
    /// Filter restricted to the given scope types.
    pub fn scopes(scopes: impl IntoIterator<Item = ScopeType>) -> Self {
        Self {
            scope: scopes.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Filter on a key substring.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            ..Default::default()
        }
    }

    /// Checks a variable (and its owning scope) against every criterion.
    pub fn matches(&self, owner: &EnvironmentScope, variable: &EnvironmentVariable) -> bool {
        if !self.scope.is_empty() && !self.scope.contains(&variable.scope) {
            return false;
        }

        if !self.var_type.is_empty() && !self.var_type.contains(&variable.var_type) {
            return false;
        }

        if let Some(enabled) = self.enabled {
            if variable.enabled != enabled {
                return false;
            }
        }

        if let Some(term) = self.search_term.as_deref() {
            if !term.is_empty() && !variable.key.contains(term) {
                return false;
            }
        }

        if let Some(collection_id) = self.collection_id.as_deref() {
            if owner.collection_id.as_deref() != Some(collection_id) {
                return false;
            }
        }

        true
    }
}

/// Field to order variables by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Key,
    Value,
    Scope,
    Type,
    CreatedAt,
    #[default]
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Sort order for variable listings. The default is `updatedAt desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariableSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl VariableSort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn by_key() -> Self {
        Self::new(SortField::Key, SortDirection::Asc)
    }

    fn compare(&self, a: &EnvironmentVariable, b: &EnvironmentVariable) -> Ordering {
        let ordering = match self.field {
            SortField::Key => a.key.cmp(&b.key),
            SortField::Value => a.value.cmp(&b.value),
            SortField::Scope => a.scope.cmp(&b.scope),
            SortField::Type => a.var_type.cmp(&b.var_type),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Sorts variables in place. Stable: ties keep their incoming order.
pub fn sort_variables(variables: &mut [EnvironmentVariable], sort: VariableSort) {
    variables.sort_by(|a, b| sort.compare(a, b));
}
