//! Polling coordinator for one speaker
//!
//! [`KefCoordinator`] wraps a [`SingleFlightCache`] of [`Snapshot`]s fetched
//! through a [`SpeakerConnector`]. It is the one authoritative view of the
//! speaker's state: entities read from it, command handlers ask it to
//! refresh, and a background task refreshes it on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use kef_api::{ApiError, SpeakerConnector};
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::CoordinatorConfig;
use crate::error::{CoordinatorError, Result};
use crate::scheduler::PollingHandle;
use crate::single_flight::{CacheState, CacheStats, Freshness, SingleFlightCache};
use crate::snapshot::Snapshot;

/// Observer view of the coordinator after each refresh cycle
pub type CoordinatorState = CacheState<Snapshot, ApiError>;

/// Fetches speaker state on an interval and shares the latest snapshot
#[derive(Clone)]
pub struct KefCoordinator {
    config: CoordinatorConfig,
    connector: Arc<dyn SpeakerConnector>,
    cache: SingleFlightCache<Snapshot, ApiError>,
}

impl KefCoordinator {
    /// Create a coordinator; no request is made until the first refresh
    pub fn new(connector: Arc<dyn SpeakerConnector>, config: CoordinatorConfig) -> Result<Self> {
        config.validate()?;

        let fetch_connector = Arc::clone(&connector);
        let cache = SingleFlightCache::new(config.name.clone(), move || {
            let connector = Arc::clone(&fetch_connector);
            async move { Snapshot::fetch(connector.as_ref()).await }
        });

        Ok(Self {
            config,
            connector,
            cache,
        })
    }

    /// Initial fetch during setup
    ///
    /// Unlike later refreshes there is no snapshot to fall back on, so a
    /// failure here is reported as [`CoordinatorError::SetupFailure`].
    pub async fn first_refresh(&self) -> Result<Arc<Snapshot>> {
        match self.cache.refresh().await {
            Ok(snapshot) => {
                info!(
                    name = %self.config.name,
                    host = self.connector.host(),
                    speaker = %snapshot.speaker_name,
                    "Initial KEF speaker data fetched"
                );
                Ok(snapshot)
            }
            Err(cause) => {
                error!(
                    name = %self.config.name,
                    host = self.connector.host(),
                    error = %cause,
                    "Initial KEF speaker data fetch failed"
                );
                Err(CoordinatorError::SetupFailure(cause))
            }
        }
    }

    /// Run one refresh cycle, or join the one in flight
    pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
        self.cache
            .refresh()
            .await
            .map_err(CoordinatorError::ConnectionFailure)
    }

    /// Refresh on demand after a state-changing command
    ///
    /// Failures are recorded as staleness and never returned.
    pub async fn request_refresh(&self) {
        self.cache.request_refresh().await
    }

    /// Latest snapshot, or `None` before the first successful refresh
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.cache.current()
    }

    /// Snapshot and freshness read together
    pub fn state(&self) -> CoordinatorState {
        self.cache.state()
    }

    /// Whether the last refresh cycle failed
    pub fn is_stale(&self) -> bool {
        self.cache.freshness().is_stale()
    }

    /// Whether the last completed refresh cycle succeeded
    pub fn last_update_success(&self) -> bool {
        matches!(self.cache.freshness(), Freshness::Fresh)
    }

    /// Cause of the last failed cycle, if the last cycle failed
    pub fn last_error(&self) -> Option<ApiError> {
        self.cache.freshness().error().cloned()
    }

    /// Observe every completed refresh cycle
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.cache.subscribe()
    }

    /// Start refreshing every `update_interval`
    pub fn start(&self) -> PollingHandle {
        info!(
            name = %self.config.name,
            host = self.connector.host(),
            interval = ?self.config.update_interval,
            "Starting KEF speaker polling"
        );
        self.cache.start_polling(self.config.update_interval)
    }

    /// Connector used for commands against the same speaker
    pub fn connector(&self) -> &Arc<dyn SpeakerConnector> {
        &self.connector
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn host(&self) -> &str {
        self.connector.host()
    }

    pub fn update_interval(&self) -> Duration {
        self.config.update_interval
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
