//! Variables module
//!
//! This module resolves `{{...}}` placeholders in request text, either from
//! the scoped variable store or from the built-in `$` system variables.

pub mod substitution;
pub mod system;

pub use substitution::{
    find_tokens, precedence_chain, resolve_string, ResolutionContext, ResolutionResult,
    ResolveOptions, ResolvedVariable, VariableSource,
};
pub use system::{
    get_system_variables, is_system_variable, resolve_system_variable, SystemVariable,
    SystemVariableCategory,
};
