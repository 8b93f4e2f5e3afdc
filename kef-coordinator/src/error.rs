//! Error types for the kef-coordinator crate.

use kef_api::ApiError;

/// Errors surfaced by the polling coordinator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinatorError {
    /// A refresh cycle failed after startup; the previous snapshot is kept
    #[error("Error communicating with KEF speaker: {0}")]
    ConnectionFailure(#[source] ApiError),

    /// The first refresh failed, so there is no snapshot to fall back on
    #[error("Unable to set up KEF speaker: {0}")]
    SetupFailure(#[source] ApiError),

    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoordinatorError {
    /// Whether this error must abort setup of the owning entity
    pub fn is_setup_failure(&self) -> bool {
        matches!(self, CoordinatorError::SetupFailure(_))
    }

    /// The connector error behind this failure, if any
    pub fn cause(&self) -> Option<&ApiError> {
        match self {
            CoordinatorError::ConnectionFailure(cause) | CoordinatorError::SetupFailure(cause) => {
                Some(cause)
            }
            CoordinatorError::Configuration(_) => None,
        }
    }
}

/// Convenience type alias for Results using CoordinatorError.
pub type Result<T> = std::result::Result<T, CoordinatorError>;
