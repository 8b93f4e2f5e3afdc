//! Per-instance registry of configured speakers
//!
//! [`KefIntegration`] owns, for every set-up config entry, the connector, the
//! coordinator with its polling task, and the media player entity. Entries
//! are keyed by entry id; dropping the integration aborts every poller.

use std::collections::HashMap;
use std::sync::Arc;

use kef_api::{ClientConfig, KefConnector, SpeakerConnector};
use kef_coordinator::{CoordinatorError, KefCoordinator, PollingHandle};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::{ConfigEntry, IntegrationConfig};
use crate::config_flow::ConfigFlow;
use crate::error::{Result, SdkError};
use crate::media_player::MediaPlayer;

/// Builds the connector for a host
pub type ConnectorFactory =
    Arc<dyn Fn(&str, &ClientConfig) -> kef_api::Result<Arc<dyn SpeakerConnector>> + Send + Sync>;

/// Factory producing HTTP-backed [`KefConnector`]s
pub fn http_connector_factory() -> ConnectorFactory {
    Arc::new(
        |host: &str, client: &ClientConfig| -> kef_api::Result<Arc<dyn SpeakerConnector>> {
            Ok(Arc::new(KefConnector::with_config(host, client)?))
        },
    )
}

struct EntryRuntime {
    entry: ConfigEntry,
    coordinator: KefCoordinator,
    entity: MediaPlayer,
    polling: PollingHandle,
}

/// Registry of set-up config entries
///
/// # Example
///
/// ```rust,no_run
/// use kef_sdk::{ConfigEntry, IntegrationConfig, KefIntegration};
///
/// # async fn demo() -> Result<(), kef_sdk::SdkError> {
/// let integration = KefIntegration::new(IntegrationConfig::default())?;
/// let player = integration
///     .setup_entry(ConfigEntry::new("living-room", "KEF LS50", "192.168.1.50"))
///     .await?;
///
/// println!("{} is {:?}", player.name(), player.state());
/// player.set_volume_level(0.3).await?;
///
/// integration.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct KefIntegration {
    config: IntegrationConfig,
    factory: ConnectorFactory,
    entries: RwLock<HashMap<String, EntryRuntime>>,
}

impl KefIntegration {
    /// Create an integration talking HTTP to real speakers
    pub fn new(config: IntegrationConfig) -> Result<Self> {
        Self::with_connector_factory(config, http_connector_factory())
    }

    /// Create an integration with a custom connector factory
    pub fn with_connector_factory(config: IntegrationConfig, factory: ConnectorFactory) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            factory,
            entries: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// Set up an entry: first refresh, start polling, create the entity
    ///
    /// Fails with [`SdkError::Setup`] when the speaker cannot be read, in
    /// which case nothing is registered. An entry id or host that is already
    /// registered is rejected before the speaker is contacted.
    pub async fn setup_entry(&self, entry: ConfigEntry) -> Result<MediaPlayer> {
        entry.validate()?;
        check_conflict(&self.entries.read(), &entry)?;

        let host = entry.unique_id().to_string();
        let connector = (self.factory)(&host, &self.config.client)
            .map_err(|e| SdkError::Setup(CoordinatorError::SetupFailure(e)))?;
        let coordinator = KefCoordinator::new(connector, self.config.coordinator.clone())?;

        coordinator.first_refresh().await?;

        let entity = MediaPlayer::new(host.clone(), coordinator.clone());
        let polling = coordinator.start();

        let mut entries = self.entries.write();
        // A concurrent setup may have won the race; dropping `polling` stops
        // this one's task.
        check_conflict(&entries, &entry)?;

        info!(entry_id = %entry.entry_id, host = %host, "Set up KEF speaker");
        entries.insert(
            entry.entry_id.clone(),
            EntryRuntime {
                entry,
                coordinator,
                entity: entity.clone(),
                polling,
            },
        );

        Ok(entity)
    }

    /// Stop polling and forget an entry
    ///
    /// Returns `false` if the entry was not set up.
    pub async fn unload_entry(&self, entry_id: &str) -> bool {
        let runtime = self.entries.write().remove(entry_id);
        match runtime {
            Some(runtime) => {
                runtime.polling.shutdown().await;
                info!(entry_id, "Unloaded KEF speaker");
                true
            }
            None => {
                debug!(entry_id, "No KEF speaker to unload");
                false
            }
        }
    }

    pub fn coordinator(&self, entry_id: &str) -> Option<KefCoordinator> {
        self.entries.read().get(entry_id).map(|r| r.coordinator.clone())
    }

    pub fn entity(&self, entry_id: &str) -> Option<MediaPlayer> {
        self.entries.read().get(entry_id).map(|r| r.entity.clone())
    }

    /// Like [`entity`](Self::entity), but an unknown id is an error
    pub fn require_entity(&self, entry_id: &str) -> Result<MediaPlayer> {
        self.entity(entry_id)
            .ok_or_else(|| SdkError::EntryNotFound(entry_id.to_string()))
    }

    pub fn entry(&self, entry_id: &str) -> Option<ConfigEntry> {
        self.entries.read().get(entry_id).map(|r| r.entry.clone())
    }

    /// Ids of all set-up entries, sorted
    pub fn entry_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Setup flow aware of the hosts already configured here
    pub fn config_flow(&self) -> ConfigFlow {
        let configured: Vec<String> = self
            .entries
            .read()
            .values()
            .map(|r| r.entry.unique_id().to_string())
            .collect();
        ConfigFlow::new(Arc::clone(&self.factory), self.config.client.clone(), configured)
    }

    /// Unload every entry
    pub async fn shutdown(&self) {
        let runtimes: Vec<EntryRuntime> = self.entries.write().drain().map(|(_, r)| r).collect();
        for runtime in runtimes {
            runtime.polling.shutdown().await;
        }
    }
}

/// Reject an entry whose id or speaker is already registered
fn check_conflict(entries: &HashMap<String, EntryRuntime>, entry: &ConfigEntry) -> Result<()> {
    if entries.contains_key(&entry.entry_id) {
        return Err(SdkError::AlreadyConfigured(entry.entry_id.clone()));
    }
    match entries
        .values()
        .find(|runtime| runtime.entry.unique_id() == entry.unique_id())
    {
        Some(existing) => Err(SdkError::HostAlreadyConfigured {
            host: entry.unique_id().to_string(),
            entry_id: existing.entry.entry_id.clone(),
        }),
        None => Ok(()),
    }
}
