//! Configuration for the polling coordinator

use std::time::Duration;

use crate::error::{CoordinatorError, Result};

/// Default polling interval in seconds
pub const UPDATE_INTERVAL: u64 = 30;

/// Configuration for a [`KefCoordinator`](crate::KefCoordinator)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Name used in log messages
    /// Default: "kef"
    pub name: String,

    /// Interval between scheduled refresh cycles
    /// Default: 30 seconds
    pub update_interval: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            name: "kef".to_string(),
            update_interval: Duration::from_secs(UPDATE_INTERVAL),
        }
    }
}

impl CoordinatorConfig {
    /// Create a new CoordinatorConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name used in log messages
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the polling interval
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.update_interval.is_zero() {
            return Err(CoordinatorError::Configuration(
                "update_interval must be greater than zero".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(CoordinatorError::Configuration(
                "name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
