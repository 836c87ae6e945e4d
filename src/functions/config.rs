//! # Function Configuration
//!
//! Loaded from `function.json` in the function's directory. Every
//! field deserializes to its unset state when absent, so a missing
//! field is reported by [`FunctionConfig::validate`] rather than by
//! the JSON parser.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{FunctionError, FunctionResult};

/// File name of the function definition inside its directory
pub const CONFIG_FILE: &str = "function.json";

/// Function definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionConfig {
    /// Function name (required)
    pub name: String,

    /// Runtime identifier (required)
    pub runtime: String,

    /// Memory size in MB (required, > 0)
    pub memory: u32,

    /// Timeout in seconds (required, > 0)
    pub timeout: u32,

    /// Execution role (required)
    pub role: String,

    pub description: String,

    pub handler: String,

    pub environment: BTreeMap<String, String>,
}

impl FunctionConfig {
    /// Read `function.json` from `dir`. Does not validate.
    pub fn load(dir: &Path) -> FunctionResult<Self> {
        let path = dir.join(CONFIG_FILE);
        let content = fs::read_to_string(&path).map_err(|e| {
            FunctionError::ConfigLoad(format!("failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            FunctionError::ConfigLoad(format!("invalid JSON in {}: {}", path.display(), e))
        })
    }

    /// Check required fields in order: Name, Runtime, Memory, Timeout, Role.
    ///
    /// Returns the first field that is unset. A memory or timeout of zero
    /// counts as unset; neither is a usable value for a deployed function.
    pub fn validate(&self) -> FunctionResult<()> {
        let checks: [(&'static str, bool); 5] = [
            ("Name", !self.name.is_empty()),
            ("Runtime", !self.runtime.is_empty()),
            ("Memory", self.memory != 0),
            ("Timeout", self.timeout != 0),
            ("Role", !self.role.is_empty()),
        ];

        for (field, set) in checks {
            if !set {
                return Err(FunctionError::Config { field });
            }
        }
        Ok(())
    }
}
