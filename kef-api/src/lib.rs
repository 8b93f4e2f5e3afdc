//! High-level KEF API for speaker control
//!
//! This crate provides a typed, trait-based API for controlling KEF
//! wireless speakers. It uses the private `kef-client` crate for the HTTP
//! transport and keeps the table of API paths and JSON shapes in
//! [`property`].
//!
//! ```rust,no_run
//! use kef_api::{KefConnector, SpeakerConnector};
//!
//! # async fn demo() -> kef_api::Result<()> {
//! let speaker = KefConnector::new("192.168.1.50")?;
//! println!("{} at volume {}", speaker.speaker_name().await?, speaker.volume().await?);
//! speaker.set_volume(35).await?;
//! speaker.pause().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Consumers that only need to read state or send commands should depend on
//! the [`SpeakerConnector`] trait rather than on [`KefConnector`] directly.

pub mod connector;
pub mod error;
pub mod property;
pub mod types;

pub use connector::{KefConnector, SpeakerConnector};
pub use error::{ApiError, Result};
pub use kef_client::ClientConfig;
pub use types::{PlayerControl, PlayerState, SongInfo, SongStatus, SpeakerStatus};
