use kef_api::ApiError;
use kef_coordinator::CoordinatorError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Setup failed: {0}")]
    Setup(#[from] CoordinatorError),

    #[error("Command failed: {0}")]
    CommandFailure(#[source] ApiError),

    #[error("Cannot connect to KEF speaker at {host}: {reason}")]
    CannotConnect { host: String, reason: String },

    #[error("Volume level {0} is outside 0.0..=1.0")]
    InvalidVolume(f64),

    #[error("Config entry not found: {0}")]
    EntryNotFound(String),

    #[error("Config entry already set up: {0}")]
    AlreadyConfigured(String),

    /// Another entry already polls this speaker
    #[error("Speaker {host} is already set up as entry {entry_id}")]
    HostAlreadyConfigured { host: String, entry_id: String },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

pub type Result<T> = std::result::Result<T, SdkError>;
