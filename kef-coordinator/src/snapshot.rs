//! Device state captured by one refresh cycle

use kef_api::{SongInfo, SongStatus, SpeakerConnector, SpeakerStatus};
use serde::Serialize;
use tracing::debug;

/// One atomically installed set of speaker state
///
/// A snapshot only exists once every read of a cycle succeeded; there is
/// deliberately no `Default`, so "no data yet" is always `None` upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub status: SpeakerStatus,
    /// Raw volume, 0-100
    pub volume: u8,
    pub muted: bool,
    /// Connector key of the active source, e.g. `wifi`
    pub source: String,
    pub speaker_name: String,
    pub song_status: SongStatus,
    pub song_info: SongInfo,
}

impl Snapshot {
    /// Read every field from the speaker
    ///
    /// Any failing read fails the whole fetch; there is no partial snapshot.
    /// Song status and metadata come from a single player read so they
    /// always describe the same track.
    pub async fn fetch(connector: &dyn SpeakerConnector) -> kef_api::Result<Self> {
        let status = connector.status().await?;
        let volume = connector.volume().await?;
        let muted = connector.is_muted().await?;
        let source = connector.source().await?;
        let speaker_name = connector.speaker_name().await?;
        let player = connector.player_state().await?;

        let snapshot = Self {
            status,
            volume,
            muted,
            source,
            speaker_name,
            song_status: player.status,
            song_info: player.info,
        };

        debug!(host = connector.host(), ?snapshot, "KEF speaker data");
        Ok(snapshot)
    }

    pub fn is_on(&self) -> bool {
        self.status.is_on()
    }
}
