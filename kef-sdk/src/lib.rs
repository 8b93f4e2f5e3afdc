//! # KEF SDK - media player integration for KEF speakers
//!
//! Wires a polling coordinator and a media player entity to each configured
//! KEF speaker (see [`constants::SUPPORTED_MODELS`]):
//!
//! ```rust,no_run
//! use kef_sdk::{ConfigEntry, FlowResult, IntegrationConfig, KefIntegration, UserInput};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kef_sdk::SdkError> {
//!     kef_sdk::logging::init_logging_from_env()?;
//!     let integration = KefIntegration::new(IntegrationConfig::default())?;
//!
//!     // Probe the speaker before adding it
//!     let flow = integration.config_flow();
//!     if let FlowResult::CreateEntry { title, data } =
//!         flow.step_user(Some(UserInput::new("192.168.1.50"))).await
//!     {
//!         let player = integration
//!             .setup_entry(ConfigEntry::new("1", title, data.host))
//!             .await?;
//!
//!         println!("{}: {:?} at {:?}", player.name(), player.state(), player.volume_level());
//!         player.select_source("Bluetooth").await?;
//!     }
//!
//!     integration.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! kef-sdk (KefIntegration, ConfigFlow, MediaPlayer)
//!     ↓
//! kef-coordinator (polling, single-flight refresh, staleness)
//!     ↓
//! kef-api (SpeakerConnector trait, KefConnector)
//!     ↓
//! kef-client (getData / setData over HTTP)
//! ```

pub use config::{ConfigEntry, ConfigError, EntryData, IntegrationConfig};
pub use config_flow::{validate_host, ConfigFlow, FlowResult, UserInput};
pub use error::{Result, SdkError};
pub use integration::{http_connector_factory, ConnectorFactory, KefIntegration};
pub use media_player::{MediaPlayer, MediaPlayerAttributes, MediaPlayerState, SupportedFeatures};

pub use kef_api::{ApiError, ClientConfig, SongInfo, SongStatus, SpeakerConnector, SpeakerStatus};
pub use kef_coordinator::{CoordinatorConfig, CoordinatorError, KefCoordinator, Snapshot};

pub mod config;
pub mod config_flow;
pub mod constants;
pub mod logging;
pub mod media_player;

mod error;
mod integration;
