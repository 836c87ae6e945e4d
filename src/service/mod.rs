//! # Function Service
//!
//! The remote platform surface the function lifecycle depends on.
//! Implementations issue one request per call; nothing here retries,
//! caches or serialises requests across calls.

mod file;
mod memory;

pub use file::FileService;
pub use memory::{MemoryService, Operation, ServiceCall};

use std::fmt;

use thiserror::Error;

use crate::functions::version::{AliasRecord, VersionRecord};

/// Result type for service calls
pub type ServiceResult<T> = Result<T, ServiceError>;

/// A failed remote request
///
/// Displays as the remote message with nothing added.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn not_found(kind: &str, name: &str) -> Self {
        Self::new(format!("{} not found: {}", kind, name))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Remote calls consumed by [`crate::functions::Function`]
pub trait FunctionService: Send + Sync + fmt::Debug {
    /// Delete a function by name
    fn delete_function(&self, name: &str) -> ServiceResult<()>;

    /// Fetch an alias of a function
    fn get_alias(&self, function_name: &str, alias_name: &str) -> ServiceResult<AliasRecord>;

    /// List all versions of a function, oldest first, `$LATEST` included
    fn list_versions(&self, function_name: &str) -> ServiceResult<Vec<VersionRecord>>;

    /// Point an existing alias at `version`
    fn update_alias(
        &self,
        function_name: &str,
        alias_name: &str,
        version: &str,
    ) -> ServiceResult<AliasRecord>;
}
