//! Observable function lifecycle events
//!
//! Events are explicit and typed.

use std::fmt;

use super::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Function definition loaded and validated
    ConfigLoaded,
    /// Function definition failed validation
    ConfigRejected,

    // Delete
    DeleteStart,
    DeleteComplete,

    // Rollback
    /// Rollback requested
    RollbackStart,
    /// Target version chosen
    RollbackResolved,
    /// Alias moved to the target version
    RollbackComplete,
    /// Rollback refused by policy
    RollbackRejected,

    // Remote
    /// A remote request failed
    RemoteCallFailed,
}

impl Event {
    /// Returns the event name string
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigRejected => "CONFIG_REJECTED",
            Event::DeleteStart => "DELETE_START",
            Event::DeleteComplete => "DELETE_COMPLETE",
            Event::RollbackStart => "ROLLBACK_START",
            Event::RollbackResolved => "ROLLBACK_RESOLVED",
            Event::RollbackComplete => "ROLLBACK_COMPLETE",
            Event::RollbackRejected => "ROLLBACK_REJECTED",
            Event::RemoteCallFailed => "REMOTE_CALL_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigRejected | Event::RemoteCallFailed => Severity::Error,
            Event::RollbackRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
