//! # Function Errors

use thiserror::Error;

use crate::service::ServiceError;

/// Result type for function operations
pub type FunctionResult<T> = Result<T, FunctionError>;

/// Rollback policy rejections
///
/// These are terminal for the call but say nothing about the health
/// of the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RollbackError {
    #[error("Can't rollback. Only one version deployed.")]
    OnlyOneVersion,

    #[error("Specified version currently deployed.")]
    AlreadyDeployed,
}

/// Function errors
#[derive(Debug, Clone, Error)]
pub enum FunctionError {
    /// A required config field is unset
    #[error("{field}: zero value")]
    Config { field: &'static str },

    /// The function definition could not be read or parsed
    #[error("Config load error: {0}")]
    ConfigLoad(String),

    /// A remote call failed; the message is passed through untouched
    #[error(transparent)]
    Remote(#[from] ServiceError),

    #[error(transparent)]
    Rollback(#[from] RollbackError),
}

impl FunctionError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FunctionError::Config { .. } => "FNCTL_CONFIG_INVALID",
            FunctionError::ConfigLoad(_) => "FNCTL_CONFIG_LOAD",
            FunctionError::Remote(_) => "FNCTL_REMOTE_CALL",
            FunctionError::Rollback(RollbackError::OnlyOneVersion) => "FNCTL_ROLLBACK_ONE_VERSION",
            FunctionError::Rollback(RollbackError::AlreadyDeployed) => {
                "FNCTL_ROLLBACK_ALREADY_DEPLOYED"
            }
        }
    }

    /// Whether the failure came from the remote service
    pub fn is_remote(&self) -> bool {
        matches!(self, FunctionError::Remote(_))
    }
}
