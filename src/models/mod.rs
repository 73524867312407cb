//! Data models for variable scopes and the variables they own.
//!
//! A scope is a named container (`global`, `collection` or `request`) that owns
//! an ordered list of variables. These types are plain data; identity and
//! mutation rules are enforced by [`crate::store::VariableStore`].

pub mod scope;
pub mod variable;

pub use scope::{EnvironmentScope, ScopeType, ScopeUpdate};
pub use variable::{EnvironmentVariable, VariableDraft, VariableType, VariableUpdate};
