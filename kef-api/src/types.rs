//! Domain types reported by the speaker

use serde::{Deserialize, Serialize};

/// Power status of the speaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeakerStatus {
    /// Speaker is on and playing or ready to play
    PowerOn,
    /// Speaker is in standby
    Standby,
}

impl SpeakerStatus {
    /// Parse the `kefSpeakerStatus` wire value
    ///
    /// Anything other than `powerOn` is reported as standby.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "powerOn" => SpeakerStatus::PowerOn,
            _ => SpeakerStatus::Standby,
        }
    }

    /// The wire value, also used as the physical source to switch power
    pub fn as_wire(&self) -> &'static str {
        match self {
            SpeakerStatus::PowerOn => "powerOn",
            SpeakerStatus::Standby => "standby",
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, SpeakerStatus::PowerOn)
    }
}

/// Playback status of the built-in player
///
/// The speaker reports an open set of states; only `playing` and `paused`
/// are recognised, everything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SongStatus {
    Playing,
    Paused,
    Other(String),
}

impl SongStatus {
    /// Parse the player `state` wire value
    pub fn from_wire(value: &str) -> Self {
        match value {
            "playing" => SongStatus::Playing,
            "paused" => SongStatus::Paused,
            other => SongStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SongStatus::Playing => "playing",
            SongStatus::Paused => "paused",
            SongStatus::Other(value) => value,
        }
    }
}

/// Metadata of the current track
///
/// Every field is optional: inputs such as optical or aux carry no metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub cover_url: Option<String>,
}

impl SongInfo {
    /// Whether no metadata field is present
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.album.is_none() && self.cover_url.is_none()
    }
}

/// Snapshot of the built-in player, as returned by `player:player/data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub status: SongStatus,
    pub info: SongInfo,
}

/// Transport controls accepted by `player:player/control`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerControl {
    Play,
    Pause,
    Next,
    Previous,
}

impl PlayerControl {
    pub fn as_wire(&self) -> &'static str {
        match self {
            PlayerControl::Play => "play",
            PlayerControl::Pause => "pause",
            PlayerControl::Next => "next",
            PlayerControl::Previous => "previous",
        }
    }
}
