//! # In-Memory Service
//!
//! Test double for [`FunctionService`]. Records every call in order and
//! can be told to fail a given operation with a fixed message.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{FunctionService, ServiceError, ServiceResult};
use crate::functions::version::{AliasRecord, VersionRecord};

/// Service operations, used for failure injection and call filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DeleteFunction,
    GetAlias,
    ListVersions,
    UpdateAlias,
}

/// A recorded call with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    DeleteFunction {
        name: String,
    },
    GetAlias {
        function_name: String,
        alias_name: String,
    },
    ListVersions {
        function_name: String,
    },
    UpdateAlias {
        function_name: String,
        alias_name: String,
        version: String,
    },
}

impl ServiceCall {
    pub fn operation(&self) -> Operation {
        match self {
            ServiceCall::DeleteFunction { .. } => Operation::DeleteFunction,
            ServiceCall::GetAlias { .. } => Operation::GetAlias,
            ServiceCall::ListVersions { .. } => Operation::ListVersions,
            ServiceCall::UpdateAlias { .. } => Operation::UpdateAlias,
        }
    }
}

#[derive(Debug, Default)]
struct MemFunction {
    versions: Vec<VersionRecord>,
    aliases: HashMap<String, AliasRecord>,
}

/// Injected failure; `nth` limits it to one call, counted from 1
#[derive(Debug, Clone)]
struct Failure {
    nth: Option<usize>,
    message: String,
}

#[derive(Debug, Default)]
struct MemState {
    functions: HashMap<String, MemFunction>,
    failures: HashMap<Operation, Failure>,
    calls: Vec<ServiceCall>,
}

/// In-memory function service
///
/// Unlike a real platform, `update_alias` accepts any version string so
/// that callers trusting their own targets can be observed.
#[derive(Debug, Default)]
pub struct MemoryService {
    state: Mutex<MemState>,
}

impl MemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a function with the given version history, in order
    pub fn with_versions(self, function_name: &str, versions: &[&str]) -> Self {
        {
            let mut state = self.state();
            let function = state.functions.entry(function_name.to_string()).or_default();
            function.versions = versions.iter().map(|v| VersionRecord::new(*v)).collect();
        }
        self
    }

    /// Seed an alias of a function
    pub fn with_alias(self, function_name: &str, alias_name: &str, version: &str) -> Self {
        {
            let mut state = self.state();
            let function = state.functions.entry(function_name.to_string()).or_default();
            function
                .aliases
                .insert(alias_name.to_string(), AliasRecord::new(alias_name, version));
        }
        self
    }

    /// Make every future call of `operation` fail with `message`
    pub fn fail_on(self, operation: Operation, message: &str) -> Self {
        self.inject(operation, None, message)
    }

    /// Make only the `nth` call of `operation` fail, counting from 1
    pub fn fail_nth(self, operation: Operation, nth: usize, message: &str) -> Self {
        self.inject(operation, Some(nth), message)
    }

    fn inject(self, operation: Operation, nth: Option<usize>, message: &str) -> Self {
        self.state().failures.insert(
            operation,
            Failure {
                nth,
                message: message.to_string(),
            },
        );
        self
    }

    /// All calls received so far
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.state().calls.clone()
    }

    /// Number of calls of one operation
    pub fn call_count(&self, operation: Operation) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    /// Current target of an alias, if the function and alias exist
    pub fn alias_version(&self, function_name: &str, alias_name: &str) -> Option<String> {
        self.state()
            .functions
            .get(function_name)
            .and_then(|f| f.aliases.get(alias_name))
            .map(|a| a.function_version.clone())
    }

    /// Whether the function is still present
    pub fn contains(&self, function_name: &str) -> bool {
        self.state().functions.contains_key(function_name)
    }

    fn state(&self) -> MutexGuard<'_, MemState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call, then apply any injected failure
    fn begin(&self, call: ServiceCall) -> ServiceResult<MutexGuard<'_, MemState>> {
        let mut state = self.state();
        let operation = call.operation();
        state.calls.push(call);
        let seen = state
            .calls
            .iter()
            .filter(|c| c.operation() == operation)
            .count();
        if let Some(failure) = state.failures.get(&operation).cloned() {
            if failure.nth.map_or(true, |n| n == seen) {
                return Err(ServiceError::new(failure.message));
            }
        }
        Ok(state)
    }
}

impl FunctionService for MemoryService {
    fn delete_function(&self, name: &str) -> ServiceResult<()> {
        let mut state = self.begin(ServiceCall::DeleteFunction {
            name: name.to_string(),
        })?;
        state
            .functions
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found("Function", name))
    }

    fn get_alias(&self, function_name: &str, alias_name: &str) -> ServiceResult<AliasRecord> {
        let state = self.begin(ServiceCall::GetAlias {
            function_name: function_name.to_string(),
            alias_name: alias_name.to_string(),
        })?;
        let function = state
            .functions
            .get(function_name)
            .ok_or_else(|| ServiceError::not_found("Function", function_name))?;
        function
            .aliases
            .get(alias_name)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("Alias", alias_name))
    }

    fn list_versions(&self, function_name: &str) -> ServiceResult<Vec<VersionRecord>> {
        let state = self.begin(ServiceCall::ListVersions {
            function_name: function_name.to_string(),
        })?;
        state
            .functions
            .get(function_name)
            .map(|f| f.versions.clone())
            .ok_or_else(|| ServiceError::not_found("Function", function_name))
    }

    fn update_alias(
        &self,
        function_name: &str,
        alias_name: &str,
        version: &str,
    ) -> ServiceResult<AliasRecord> {
        let mut state = self.begin(ServiceCall::UpdateAlias {
            function_name: function_name.to_string(),
            alias_name: alias_name.to_string(),
            version: version.to_string(),
        })?;
        let function = state
            .functions
            .get_mut(function_name)
            .ok_or_else(|| ServiceError::not_found("Function", function_name))?;
        if !function.aliases.contains_key(alias_name) {
            return Err(ServiceError::not_found("Alias", alias_name));
        }
        let alias = AliasRecord::new(alias_name, version);
        function.aliases.insert(alias_name.to_string(), alias.clone());
        Ok(alias)
    }
}
