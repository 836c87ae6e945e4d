//! # Versions and Aliases

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for the mutable, unpublished head of a function
pub const LATEST: &str = "$LATEST";

/// Alias managed by rollbacks
pub const CURRENT_ALIAS: &str = "current";

/// A published (or `$LATEST`) version as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Version identifier, opaque to the resolver
    pub version: String,

    /// SHA-256 of the deployed code, hex encoded
    #[serde(default)]
    pub code_sha256: String,

    #[serde(default)]
    pub description: String,

    /// Last modification time
    pub last_modified: DateTime<Utc>,
}

impl VersionRecord {
    /// Create a record with only a version identifier
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            code_sha256: String::new(),
            description: String::new(),
            last_modified: Utc::now(),
        }
    }

    /// Whether this is the `$LATEST` sentinel
    pub fn is_latest(&self) -> bool {
        self.version == LATEST
    }
}

/// A named pointer to exactly one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    /// Alias name
    pub name: String,

    /// Version the alias resolves to
    pub function_version: String,

    /// Changes on every update
    pub revision_id: String,

    #[serde(default)]
    pub description: String,
}

impl AliasRecord {
    /// Create an alias pointing at `version`
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            function_version: version.into(),
            revision_id: uuid::Uuid::new_v4().to_string(),
            description: String::new(),
        }
    }
}

/// Versions eligible for rollback plus the one currently deployed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionReport {
    pub function: String,
    pub alias: String,
    pub current: String,
    pub versions: Vec<String>,
}
