//! Polling coordinator for KEF speaker state
//!
//! The coordinator keeps one authoritative snapshot of a speaker's state,
//! refreshes it on a fixed interval or on demand, and tells observers when
//! that snapshot has gone stale:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kef_api::KefConnector;
//! use kef_coordinator::{CoordinatorConfig, KefCoordinator};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let connector = Arc::new(KefConnector::new("192.168.1.50")?);
//! let coordinator = KefCoordinator::new(connector, CoordinatorConfig::default())?;
//!
//! // Fatal if the speaker cannot be reached
//! coordinator.first_refresh().await?;
//! let polling = coordinator.start();
//!
//! if let Some(snapshot) = coordinator.current() {
//!     println!("{} volume {}", snapshot.speaker_name, snapshot.volume);
//! }
//! if coordinator.is_stale() {
//!     println!("last refresh failed: {:?}", coordinator.last_error());
//! }
//!
//! polling.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! KefCoordinator (snapshot fetch, setup vs. transient failures)
//!     ↓
//! SingleFlightCache (one fetch at a time, atomic install, staleness)
//!     ↓
//! PollingHandle (fixed-interval background refresh)
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod scheduler;
pub mod single_flight;
pub mod snapshot;

pub use config::{CoordinatorConfig, UPDATE_INTERVAL};
pub use coordinator::{CoordinatorState, KefCoordinator};
pub use error::{CoordinatorError, Result};
pub use scheduler::PollingHandle;
pub use single_flight::{CacheState, CacheStats, Freshness, SingleFlightCache};
pub use snapshot::Snapshot;
