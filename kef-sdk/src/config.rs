//! Configuration entries and integration-wide settings

use std::time::Duration;

use kef_api::ClientConfig;
use kef_coordinator::CoordinatorConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems with a config entry or the integration settings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("entry id must not be empty")]
    EmptyEntryId,

    #[error("{0} timeout must be non-zero")]
    ZeroTimeout(&'static str),
}

/// User-supplied data of a config entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryData {
    /// Hostname or IP address of the speaker
    pub host: String,
}

/// One configured speaker, as a host would persist it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: String,
    pub title: String,
    pub data: EntryData,
}

impl ConfigEntry {
    pub fn new(entry_id: impl Into<String>, title: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            entry_id: entry_id.into(),
            title: title.into(),
            data: EntryData { host: host.into() },
        }
    }

    /// The host doubles as the entry's unique id
    pub fn unique_id(&self) -> &str {
        self.data.host.trim()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entry_id.trim().is_empty() {
            return Err(ConfigError::EmptyEntryId);
        }
        if self.data.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        Ok(())
    }
}

/// Settings shared by every entry of a [`KefIntegration`](crate::KefIntegration)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationConfig {
    /// Polling settings for each entry's coordinator
    pub coordinator: CoordinatorConfig,

    /// HTTP settings for each entry's connector
    pub client: ClientConfig,
}

impl IntegrationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.coordinator = self.coordinator.with_update_interval(interval);
        self
    }

    pub fn with_client(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    pub fn validate(&self) -> Result<(), crate::SdkError> {
        self.coordinator.validate()?;
        if self.client.connect_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("connect").into());
        }
        if self.client.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("request").into());
        }
        Ok(())
    }
}
