//! Media player entity backed by a coordinator
//!
//! [`MediaPlayer`] derives every property from the coordinator's current
//! snapshot and degrades to `None` or defaults when there is none. Commands
//! go straight to the connector and then ask the coordinator for an
//! immediate refresh, so the entity reflects the speaker's answer rather
//! than an optimistic guess.

use std::sync::Arc;

use bitflags::bitflags;
use kef_api::{SongStatus, SpeakerConnector};
use kef_coordinator::{KefCoordinator, Snapshot};
use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::{source_display_name, source_key, DEFAULT_NAME, KEF_SOURCES};
use crate::error::{Result, SdkError};

/// Volume change applied by [`MediaPlayer::volume_up`] and [`MediaPlayer::volume_down`]
pub const VOLUME_STEP: u8 = 5;

/// Presentation state of the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaPlayerState {
    Off,
    Idle,
    Playing,
    Paused,
}

bitflags! {
    /// Commands the entity accepts
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SupportedFeatures: u32 {
        const PAUSE = 1;
        const VOLUME_SET = 1 << 2;
        const VOLUME_MUTE = 1 << 3;
        const PREVIOUS_TRACK = 1 << 4;
        const NEXT_TRACK = 1 << 5;
        const TURN_ON = 1 << 7;
        const TURN_OFF = 1 << 8;
        const SELECT_SOURCE = 1 << 11;
        const PLAY = 1 << 14;
    }
}

/// Serialisable summary of everything the entity exposes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaPlayerAttributes {
    pub name: String,
    pub state: MediaPlayerState,
    pub available: bool,
    pub stale: bool,
    pub volume_level: Option<f64>,
    pub is_volume_muted: Option<bool>,
    pub source: Option<String>,
    pub source_list: Vec<&'static str>,
    pub media_title: Option<String>,
    pub media_artist: Option<String>,
    pub media_album_name: Option<String>,
    pub media_image_url: Option<String>,
    /// [`SupportedFeatures`] bits
    pub supported_features: u32,
}

/// Convert a 0.0..=1.0 level to the speaker's 0..=100 scale
///
/// Returns `None` for levels outside the range and for NaN.
pub fn volume_to_device(level: f64) -> Option<u8> {
    if !(0.0..=1.0).contains(&level) {
        return None;
    }
    Some((level * 100.0).round().clamp(0.0, 100.0) as u8)
}

/// Convert the speaker's 0..=100 volume to a 0.0..=1.0 level
pub fn volume_from_device(volume: u8) -> f64 {
    f64::from(volume) / 100.0
}

/// Media player entity for one configured speaker
#[derive(Clone)]
pub struct MediaPlayer {
    host: String,
    coordinator: KefCoordinator,
}

impl std::fmt::Debug for MediaPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaPlayer")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl MediaPlayer {
    pub fn new(host: impl Into<String>, coordinator: KefCoordinator) -> Self {
        Self {
            host: host.into(),
            coordinator,
        }
    }

    pub fn coordinator(&self) -> &KefCoordinator {
        &self.coordinator
    }

    fn connector(&self) -> &Arc<dyn SpeakerConnector> {
        self.coordinator.connector()
    }

    fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.coordinator.current()
    }

    // ========================================================================
    // Properties
    // ========================================================================

    pub fn name(&self) -> String {
        self.snapshot()
            .map(|s| s.speaker_name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string())
    }

    pub fn unique_id(&self) -> &str {
        &self.host
    }

    pub fn state(&self) -> MediaPlayerState {
        match self.snapshot() {
            Some(snapshot) if snapshot.is_on() => match snapshot.song_status {
                SongStatus::Playing => MediaPlayerState::Playing,
                SongStatus::Paused => MediaPlayerState::Paused,
                SongStatus::Other(_) => MediaPlayerState::Idle,
            },
            _ => MediaPlayerState::Off,
        }
    }

    /// Whether there is data and the last refresh succeeded
    pub fn available(&self) -> bool {
        self.snapshot().is_some() && self.coordinator.last_update_success()
    }

    /// Whether the shown data is left over from before a failed refresh
    pub fn is_stale(&self) -> bool {
        self.snapshot().is_some() && self.coordinator.is_stale()
    }

    pub fn volume_level(&self) -> Option<f64> {
        self.snapshot().map(|s| volume_from_device(s.volume))
    }

    pub fn is_volume_muted(&self) -> Option<bool> {
        self.snapshot().map(|s| s.muted)
    }

    /// Display name of the active source, or the raw key if it is not a known one
    pub fn source(&self) -> Option<String> {
        self.snapshot().map(|s| {
            source_display_name(&s.source)
                .map(str::to_string)
                .unwrap_or_else(|| s.source.clone())
        })
    }

    pub fn source_list(&self) -> Vec<&'static str> {
        KEF_SOURCES.iter().map(|(_, name)| *name).collect()
    }

    pub fn media_title(&self) -> Option<String> {
        self.snapshot().and_then(|s| s.song_info.title.clone())
    }

    pub fn media_artist(&self) -> Option<String> {
        self.snapshot().and_then(|s| s.song_info.artist.clone())
    }

    pub fn media_album_name(&self) -> Option<String> {
        self.snapshot().and_then(|s| s.song_info.album.clone())
    }

    pub fn media_image_url(&self) -> Option<String> {
        self.snapshot().and_then(|s| s.song_info.cover_url.clone())
    }

    pub fn supported_features(&self) -> SupportedFeatures {
        SupportedFeatures::all()
    }

    pub fn state_attributes(&self) -> MediaPlayerAttributes {
        MediaPlayerAttributes {
            name: self.name(),
            state: self.state(),
            available: self.available(),
            stale: self.is_stale(),
            volume_level: self.volume_level(),
            is_volume_muted: self.is_volume_muted(),
            source: self.source(),
            source_list: self.source_list(),
            media_title: self.media_title(),
            media_artist: self.media_artist(),
            media_album_name: self.media_album_name(),
            media_image_url: self.media_image_url(),
            supported_features: self.supported_features().bits(),
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    pub async fn turn_on(&self) -> Result<()> {
        let result = self.connector().power_on().await;
        self.finish("turn_on", result).await
    }

    pub async fn turn_off(&self) -> Result<()> {
        let result = self.connector().power_off().await;
        self.finish("turn_off", result).await
    }

    /// Set the volume from a 0.0..=1.0 level
    pub async fn set_volume_level(&self, level: f64) -> Result<()> {
        let volume = volume_to_device(level).ok_or(SdkError::InvalidVolume(level))?;
        let result = self.connector().set_volume(volume).await;
        self.finish("set_volume_level", result).await
    }

    pub async fn volume_up(&self) -> Result<()> {
        let volume = self.device_volume().await?;
        self.step_volume("volume_up", volume.saturating_add(VOLUME_STEP).min(100)).await
    }

    pub async fn volume_down(&self) -> Result<()> {
        let volume = self.device_volume().await?;
        self.step_volume("volume_down", volume.saturating_sub(VOLUME_STEP)).await
    }

    pub async fn mute_volume(&self, mute: bool) -> Result<()> {
        let result = if mute {
            self.connector().mute().await
        } else {
            self.connector().unmute().await
        };
        self.finish("mute_volume", result).await
    }

    /// Switch to the source with this display name
    ///
    /// Names not in [`KEF_SOURCES`] are ignored.
    pub async fn select_source(&self, source: &str) -> Result<()> {
        let Some(key) = source_key(source) else {
            debug!(host = %self.host, source, "Ignoring unknown source");
            return Ok(());
        };
        let result = self.connector().set_source(key).await;
        self.finish("select_source", result).await
    }

    pub async fn media_play(&self) -> Result<()> {
        let result = self.connector().play().await;
        self.finish("media_play", result).await
    }

    pub async fn media_pause(&self) -> Result<()> {
        let result = self.connector().pause().await;
        self.finish("media_pause", result).await
    }

    pub async fn media_next_track(&self) -> Result<()> {
        let result = self.connector().next().await;
        self.finish("media_next_track", result).await
    }

    pub async fn media_previous_track(&self) -> Result<()> {
        let result = self.connector().prev().await;
        self.finish("media_previous_track", result).await
    }

    async fn device_volume(&self) -> Result<u8> {
        match self.snapshot() {
            Some(snapshot) => Ok(snapshot.volume),
            None => self.connector().volume().await.map_err(SdkError::CommandFailure),
        }
    }

    async fn step_volume(&self, command: &str, volume: u8) -> Result<()> {
        let result = self.connector().set_volume(volume).await;
        self.finish(command, result).await
    }

    /// Refresh after a successful command; report a failed one
    async fn finish(&self, command: &str, result: kef_api::Result<()>) -> Result<()> {
        match result {
            Ok(()) => {
                debug!(host = %self.host, command, "Command sent");
                self.coordinator.request_refresh().await;
                Ok(())
            }
            Err(e) => {
                warn!(host = %self.host, command, error = %e, "Command failed");
                Err(SdkError::CommandFailure(e))
            }
        }
    }
}
