//! Scope data models.
//!
//! Scopes group variables by where they apply: everywhere (`global`), inside a
//! single collection (`collection`), or for one request (`request`).

use super::variable::EnvironmentVariable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The level a scope applies at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeType {
    /// Shared defaults, consulted last during resolution
    Global,
    /// Variables owned by a collection
    Collection,
    /// Variables owned by a single request
    Request,
}

impl ScopeType {
    /// Returns the lowercase name used in exports and serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeType::Global => "global",
            ScopeType::Collection => "collection",
            ScopeType::Request => "request",
        }
    }

    /// Parses a scope type name (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "global" => Some(ScopeType::Global),
            "collection" => Some(ScopeType::Collection),
            "request" => Some(ScopeType::Request),
            _ => None,
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named container of variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentScope {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Display label
    pub name: String,

    /// Level this scope applies at
    #[serde(rename = "type")]
    pub scope_type: ScopeType,

    /// Owning collection, only set for `collection` scopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,

    /// Owning request, only set for `request` scopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Variables in insertion order
    #[serde(default)]
    pub variables: Vec<EnvironmentVariable>,

    /// Whether this is the store-wide active scope
    #[serde(default)]
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl EnvironmentScope {
    /// Creates an empty, inactive scope with a fresh id.
    ///
    /// Owner ids that do not fit the scope type are dropped: only a
    /// `collection` scope keeps `collection_id` and only a `request` scope
    /// keeps `request_id`.
    pub fn new(
        name: impl Into<String>,
        scope_type: ScopeType,
        collection_id: Option<String>,
        request_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            scope_type,
            collection_id: collection_id.filter(|_| scope_type == ScopeType::Collection),
            request_id: request_id.filter(|_| scope_type == ScopeType::Request),
            variables: Vec::new(),
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Finds a variable by key, enabled or not.
    pub fn find_by_key(&self, key: &str) -> Option<&EnvironmentVariable> {
        self.variables.iter().find(|v| v.key == key)
    }

    /// Finds an enabled variable by key. Disabled variables are skipped.
    pub fn find_enabled(&self, key: &str) -> Option<&EnvironmentVariable> {
        self.variables.iter().find(|v| v.enabled && v.key == key)
    }

    /// Checks whether this scope is identified by `id`.
    ///
    /// Matches the scope's own id as well as the owning collection or request
    /// id, so callers can address a scope by the entity it belongs to.
    pub fn matches_context(&self, id: &str) -> bool {
        self.id == id
            || self.collection_id.as_deref() == Some(id)
            || self.request_id.as_deref() == Some(id)
    }
}

/// Partial update applied by [`crate::store::VariableStore::update_scope`].
///
/// `None` fields are left untouched. The scope id can never be changed.
/// Owner ids are doubly optional: `Some(None)` clears the id, `Some(Some(id))`
/// sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeUpdate {
    pub name: Option<String>,
    pub scope_type: Option<ScopeType>,
    pub collection_id: Option<Option<String>>,
    pub request_id: Option<Option<String>>,
}

impl ScopeUpdate {
    /// Update that only renames the scope.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}
