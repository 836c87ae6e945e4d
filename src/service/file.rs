//! # File Service
//!
//! Durable JSON state file standing in for the remote platform.
//! Each request loads the file, applies one change and writes it back.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{FunctionService, ServiceError, ServiceResult};
use crate::functions::config::FunctionConfig;
use crate::functions::version::{AliasRecord, VersionRecord, LATEST};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredFunction {
    config: FunctionConfig,

    /// Oldest first, `$LATEST` at the head
    versions: Vec<VersionRecord>,

    #[serde(default)]
    aliases: BTreeMap<String, AliasRecord>,

    /// Ordinal assigned to the next published version
    next_version: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PlatformState {
    #[serde(default)]
    functions: BTreeMap<String, StoredFunction>,
}

/// JSON file-backed function service
#[derive(Debug)]
pub struct FileService {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileService {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: Mutex::new(()),
        }
    }

    /// Whether a function exists
    pub fn has_function(&self, name: &str) -> ServiceResult<bool> {
        self.with_state(|state| Ok(state.functions.contains_key(name)))
    }

    /// Whether a function has an alias
    pub fn has_alias(&self, function_name: &str, alias_name: &str) -> ServiceResult<bool> {
        self.with_state(|state| {
            Ok(lookup(state, function_name)?
                .aliases
                .contains_key(alias_name))
        })
    }

    /// Create a function with only its `$LATEST` version
    pub fn create_function(&self, config: &FunctionConfig) -> ServiceResult<()> {
        self.mutate(|state| {
            if state.functions.contains_key(&config.name) {
                return Err(ServiceError::new(format!(
                    "Function already exists: {}",
                    config.name
                )));
            }
            state.functions.insert(
                config.name.clone(),
                StoredFunction {
                    config: config.clone(),
                    versions: vec![VersionRecord::new(LATEST)],
                    aliases: BTreeMap::new(),
                    next_version: 1,
                },
            );
            Ok(())
        })
    }

    /// Upload `code` as `$LATEST` and publish it as the next version
    pub fn publish_version(
        &self,
        function_name: &str,
        code: &[u8],
        description: &str,
    ) -> ServiceResult<VersionRecord> {
        let mut hasher = Sha256::new();
        hasher.update(code);
        let code_sha256 = format!("{:x}", hasher.finalize());

        self.mutate(|state| {
            let function = lookup_mut(state, function_name)?;
            let now = Utc::now();

            if let Some(head) = function.versions.iter_mut().find(|v| v.is_latest()) {
                head.code_sha256 = code_sha256.clone();
                head.last_modified = now;
            }

            let record = VersionRecord {
                version: function.next_version.to_string(),
                code_sha256,
                description: description.to_string(),
                last_modified: now,
            };
            function.next_version += 1;
            function.versions.push(record.clone());
            Ok(record)
        })
    }

    /// Create a new alias pointing at an existing version
    pub fn create_alias(
        &self,
        function_name: &str,
        alias_name: &str,
        version: &str,
    ) -> ServiceResult<AliasRecord> {
        self.mutate(|state| {
            let function = lookup_mut(state, function_name)?;
            if function.aliases.contains_key(alias_name) {
                return Err(ServiceError::new(format!(
                    "Alias already exists: {}",
                    alias_name
                )));
            }
            require_version(function, version)?;

            let alias = AliasRecord::new(alias_name, version);
            function
                .aliases
                .insert(alias_name.to_string(), alias.clone());
            Ok(alias)
        })
    }

    fn load(&self) -> ServiceResult<PlatformState> {
        if !self.path.exists() {
            return Ok(PlatformState::default());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| ServiceError::new(format!("Failed to read state file: {}", e)))?;

        if content.trim().is_empty() {
            return Ok(PlatformState::default());
        }

        serde_json::from_str(&content)
            .map_err(|e| ServiceError::new(format!("Failed to parse state file: {}", e)))
    }

    fn save(&self, state: &PlatformState) -> ServiceResult<()> {
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| ServiceError::new(format!("Failed to serialize state: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ServiceError::new(format!("Failed to create state directory: {}", e))
                })?;
            }
        }

        fs::write(&self.path, content)
            .map_err(|e| ServiceError::new(format!("Failed to write state file: {}", e)))
    }

    fn with_state<T>(
        &self,
        f: impl FnOnce(&PlatformState) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let state = self.load()?;
        f(&state)
    }

    /// Load, apply `f`, and persist only if `f` succeeded
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut PlatformState) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut state = self.load()?;
        let result = f(&mut state)?;
        self.save(&state)?;
        Ok(result)
    }
}

fn lookup<'a>(state: &'a PlatformState, name: &str) -> ServiceResult<&'a StoredFunction> {
    state
        .functions
        .get(name)
        .ok_or_else(|| ServiceError::not_found("Function", name))
}

fn lookup_mut<'a>(
    state: &'a mut PlatformState,
    name: &str,
) -> ServiceResult<&'a mut StoredFunction> {
    state
        .functions
        .get_mut(name)
        .ok_or_else(|| ServiceError::not_found("Function", name))
}

fn require_version(function: &StoredFunction, version: &str) -> ServiceResult<()> {
    if function.versions.iter().any(|v| v.version == version) {
        Ok(())
    } else {
        Err(ServiceError::not_found("Version", version))
    }
}

impl FunctionService for FileService {
    fn delete_function(&self, name: &str) -> ServiceResult<()> {
        self.mutate(|state| {
            state
                .functions
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| ServiceError::not_found("Function", name))
        })
    }

    fn get_alias(&self, function_name: &str, alias_name: &str) -> ServiceResult<AliasRecord> {
        self.with_state(|state| {
            lookup(state, function_name)?
                .aliases
                .get(alias_name)
                .cloned()
                .ok_or_else(|| ServiceError::not_found("Alias", alias_name))
        })
    }

    fn list_versions(&self, function_name: &str) -> ServiceResult<Vec<VersionRecord>> {
        self.with_state(|state| Ok(lookup(state, function_name)?.versions.clone()))
    }

    fn update_alias(
        &self,
        function_name: &str,
        alias_name: &str,
        version: &str,
    ) -> ServiceResult<AliasRecord> {
        self.mutate(|state| {
            let function = lookup_mut(state, function_name)?;
            require_version(function, version)?;

            let alias = function
                .aliases
                .get_mut(alias_name)
                .ok_or_else(|| ServiceError::not_found("Alias", alias_name))?;
            let description = alias.description.clone();
            *alias = AliasRecord {
                description,
                ..AliasRecord::new(alias_name, version)
            };
            Ok(alias.clone())
        })
    }
}
