//! Scoped variables and template resolution for a REST client.
//!
//! Variables live in named scopes at three levels (`global`, `collection`,
//! `request`). Request text refers to them with `{{name}}` placeholders, and
//! `{{$name}}` placeholders produce fresh dynamic values (timestamps, UUIDs,
//! random data).
//!
//! # Architecture
//!
//! - **models**: Scope and variable records, drafts and partial updates
//! - **validation**: Key grammar and draft validation
//! - **store**: In-memory registry of scopes with filtering and sorting
//! - **variables**: `{{...}}` resolution and the `$` system variable catalog
//! - **export**: JSON, dotenv and CSV export plus the matching importers
//! - **config**: Engine settings and loading them from host settings JSON
//! - **manager**: The facade, change events and the thread-safe session
//!
//! # Resolution order
//!
//! When resolving for a collection or request, that context's own scopes are
//! consulted first and every global scope after them. Disabled variables are
//! invisible. Anything that cannot be resolved is left in the output verbatim
//! and reported in [`variables::ResolutionResult::unresolved`].
//!
//! ```
//! use rest_variables::{ScopeType, VariableDraft, VariableManager};
//!
//! let mut manager = VariableManager::default();
//! let scope = manager.create_scope("Globals", ScopeType::Global, None, None);
//! manager.add_variable(&scope.id, VariableDraft::new("host", "localhost")).unwrap();
//!
//! let result = manager.resolve_string("http://{{host}}/{{missing}}", None);
//! assert_eq!(result.resolved, "http://localhost/{{missing}}");
//! assert_eq!(result.unresolved, vec!["missing".to_string()]);
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod manager;
pub mod models;
pub mod store;
pub mod validation;
pub mod variables;

pub use config::{load_config, ConfigUpdate, EngineConfig};
pub use error::{Result, VariableError};
pub use export::{ExportFormat, ExportOptions, ImportSummary};
pub use manager::{ChangeEvent, ChangeListener, VariableManager, VariableSession};
pub use models::{
    EnvironmentScope, EnvironmentVariable, ScopeType, ScopeUpdate, VariableDraft, VariableType,
    VariableUpdate,
};
pub use store::{VariableFilter, VariableSort, VariableStore};
pub use variables::{ResolutionContext, ResolutionResult};
