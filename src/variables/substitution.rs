//! Template resolution for `{{KEY}}` placeholders.
//!
//! This module scans request text (URLs, header values, bodies) for
//! `{{...}}` placeholders and replaces each one from the variable store or the
//! system variable catalog. Resolution never fails: anything that cannot be
//! resolved is left in place and reported in [`ResolutionResult::unresolved`].

use super::system::resolve_system_variable;
use crate::models::{EnvironmentScope, EnvironmentVariable, ScopeType};
use crate::store::VariableStore;
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Cached regex for `{{token}}`. Placeholders do not nest and the inner text
/// cannot contain `}`.
static VARIABLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("Failed to compile variable regex"));

/// Scope a resolution is performed in.
///
/// `id` may be the scope's own id or the id of the collection / request that
/// owns it. A `global` context adds nothing: global scopes are always the
/// fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionContext {
    pub scope_type: ScopeType,
    pub id: String,
}

impl ResolutionContext {
    pub fn new(scope_type: ScopeType, id: impl Into<String>) -> Self {
        Self {
            scope_type,
            id: id.into(),
        }
    }

    pub fn collection(id: impl Into<String>) -> Self {
        Self::new(ScopeType::Collection, id)
    }

    pub fn request(id: impl Into<String>) -> Self {
        Self::new(ScopeType::Request, id)
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableSource {
    Global,
    Collection,
    Request,
    /// A built-in `$` variable
    System,
}

impl From<ScopeType> for VariableSource {
    fn from(scope: ScopeType) -> Self {
        match scope {
            ScopeType::Global => VariableSource::Global,
            ScopeType::Collection => VariableSource::Collection,
            ScopeType::Request => VariableSource::Request,
        }
    }
}

/// One successful substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVariable {
    pub key: String,
    pub value: String,
    pub scope: VariableSource,
}

/// Output of [`resolve_string`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// The template with every resolvable placeholder substituted
    pub resolved: String,
    /// One entry per substituted placeholder, in template order
    pub variables: Vec<ResolvedVariable>,
    /// Tokens that were left in place, in template order
    pub unresolved: Vec<String>,
}

impl ResolutionResult {
    /// True when every placeholder was substituted.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Switches applied during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// When false, `$` tokens are treated as ordinary unresolved tokens
    pub system_variables: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            system_variables: true,
        }
    }
}

/// Builds the ordered list of scopes consulted for a context.
///
/// The context's own `collection` / `request` scopes come first, then every
/// `global` scope in store order.
pub fn precedence_chain<'a>(
    store: &'a VariableStore,
    context: Option<&ResolutionContext>,
) -> Vec<&'a EnvironmentScope> {
    let mut chain: Vec<&EnvironmentScope> = Vec::new();

    if let Some(ctx) = context {
        if ctx.scope_type != ScopeType::Global {
            chain.extend(
                store
                    .scopes()
                    .filter(|s| s.scope_type == ctx.scope_type && s.matches_context(&ctx.id)),
            );
        }
    }

    chain.extend(store.scopes().filter(|s| s.scope_type == ScopeType::Global));
    chain
}

/// Finds the first enabled variable named `key` along the chain.
fn lookup<'a>(chain: &[&'a EnvironmentScope], key: &str) -> Option<&'a EnvironmentVariable> {
    chain.iter().find_map(|scope| scope.find_enabled(key))
}

/// Resolves every `{{...}}` placeholder in `template`.
///
/// Tokens starting with `$` go to the system catalog. Other tokens walk the
/// precedence chain: the context scope first, then global. Unresolvable
/// placeholders are copied verbatim (delimiters and inner whitespace
/// included) and their trimmed token is appended to `unresolved`.
///
/// Substituted values are inserted as-is and are not scanned again.
///
/// # Example
///
/// ```
/// use rest_variables::models::{ScopeType, VariableDraft};
/// use rest_variables::store::VariableStore;
/// use rest_variables::variables::substitution::{resolve_string, ResolveOptions};
///
/// let mut store = VariableStore::new();
/// let globals = store.create_scope("Globals", ScopeType::Global, None, None);
/// store.add_variable(&globals.id, VariableDraft::new("A", "x")).unwrap();
///
/// let result = resolve_string(&store, "{{A}}/{{MISSING}}", None, ResolveOptions::default());
/// assert_eq!(result.resolved, "x/{{MISSING}}");
/// assert_eq!(result.unresolved, vec!["MISSING".to_string()]);
/// ```
pub fn resolve_string(
    store: &VariableStore,
    template: &str,
    context: Option<&ResolutionContext>,
    options: ResolveOptions,
) -> ResolutionResult {
    // Fast path: no markers, nothing to do
    if !template.contains("{{") {
        return ResolutionResult {
            resolved: template.to_string(),
            ..Default::default()
        };
    }

    let chain = precedence_chain(store, context);
    let mut result = ResolutionResult {
        resolved: String::with_capacity(template.len() + template.len() / 4),
        ..Default::default()
    };
    let mut last_match_end = 0;

    for cap in VARIABLE_REGEX.captures_iter(template) {
        let (Some(full_match), Some(inner)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let token = inner.as_str().trim();

        result.resolved.push_str(&template[last_match_end..full_match.start()]);
        last_match_end = full_match.end();

        if token.is_empty() {
            result.resolved.push_str(full_match.as_str());
            continue;
        }

        let resolved = if token.starts_with('$') {
            options
                .system_variables
                .then(|| resolve_system_variable(token))
                .flatten()
                .map(|value| (value, VariableSource::System))
        } else {
            lookup(&chain, token).map(|var| (var.value.clone(), VariableSource::from(var.scope)))
        };

        match resolved {
            Some((value, scope)) => {
                result.resolved.push_str(&value);
                result.variables.push(ResolvedVariable {
                    key: token.to_string(),
                    value,
                    scope,
                });
            }
            None => {
                trace!("Unresolved token '{}'", token);
                result.resolved.push_str(full_match.as_str());
                result.unresolved.push(token.to_string());
            }
        }
    }

    result.resolved.push_str(&template[last_match_end..]);
    result
}

/// Lists the trimmed tokens of every placeholder in `template`, in order.
pub fn find_tokens(template: &str) -> Vec<String> {
    VARIABLE_REGEX
        .captures_iter(template)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|token| !token.is_empty())
        .collect()
}
