//! # Function Lifecycle
//!
//! Validation, deletion and alias rollback for a single function on a
//! managed serverless platform.

pub mod config;
pub mod errors;
pub mod function;
pub mod resolver;
pub mod version;

pub use config::{FunctionConfig, CONFIG_FILE};
pub use errors::{FunctionError, FunctionResult, RollbackError};
pub use function::Function;
pub use resolver::{check_explicit_target, eligible_versions, resolve_rollback_target};
pub use version::{AliasRecord, VersionRecord, VersionReport, CURRENT_ALIAS, LATEST};
