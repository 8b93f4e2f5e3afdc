use async_trait::async_trait;
use kef_client::{ClientConfig, KefClient};
use serde_json::json;
use tracing::debug;

use crate::error::Result;
use crate::property::{
    DeviceName, KefProperty, MuteState, PhysicalSource, PlayerData, PlayerVolume, PowerStatus,
    WritableProperty, PLAYER_CONTROL_PATH,
};
use crate::types::{PlayerControl, PlayerState, SongInfo, SongStatus, SpeakerStatus};

/// Asynchronous access to one speaker
///
/// One method per accessor or action verb, each returning a typed result.
/// The polling coordinator and the media player entity depend only on this
/// trait, so tests can substitute an in-memory speaker.
#[async_trait]
pub trait SpeakerConnector: Send + Sync {
    /// Host (name or IP address) this connector talks to
    fn host(&self) -> &str;

    async fn status(&self) -> Result<SpeakerStatus>;
    /// Master volume, 0-100
    async fn volume(&self) -> Result<u8>;
    async fn is_muted(&self) -> Result<bool>;
    /// Key of the active physical source, e.g. `wifi`
    async fn source(&self) -> Result<String>;
    async fn speaker_name(&self) -> Result<String>;
    async fn song_status(&self) -> Result<SongStatus>;
    async fn song_information(&self) -> Result<SongInfo>;

    /// Song status and track metadata taken from one player response
    ///
    /// The default reads the two accessors separately; connectors that can
    /// fetch both at once should override it.
    async fn player_state(&self) -> Result<PlayerState> {
        Ok(PlayerState {
            status: self.song_status().await?,
            info: self.song_information().await?,
        })
    }

    async fn power_on(&self) -> Result<()>;
    async fn power_off(&self) -> Result<()>;
    async fn play(&self) -> Result<()>;
    async fn pause(&self) -> Result<()>;
    async fn next(&self) -> Result<()>;
    async fn prev(&self) -> Result<()>;
    async fn mute(&self) -> Result<()>;
    async fn unmute(&self) -> Result<()>;

    /// Set the master volume, 0-100
    async fn set_volume(&self, volume: u8) -> Result<()>;
    /// Switch to the physical source with the given key
    async fn set_source(&self, source: &str) -> Result<()>;
}

/// [`SpeakerConnector`] backed by the speaker's HTTP API
#[derive(Debug, Clone)]
pub struct KefConnector {
    host: String,
    client: KefClient,
}

impl KefConnector {
    /// Create a connector for `host` with default timeouts
    pub fn new(host: &str) -> Result<Self> {
        Self::with_config(host, &ClientConfig::default())
    }

    /// Create a connector for `host` with custom timeouts and port
    pub fn with_config(host: &str, config: &ClientConfig) -> Result<Self> {
        let client = KefClient::with_config(host, config)?;
        Ok(Self::with_client(host.trim(), client))
    }

    /// Create a connector around an existing client
    pub fn with_client(host: impl Into<String>, client: KefClient) -> Self {
        Self {
            host: host.into(),
            client,
        }
    }

    /// Read and decode a property
    pub async fn read<P: KefProperty>(&self) -> Result<P::Value> {
        let raw = self.client.get_data(P::PATH).await?;
        P::decode(&raw)
    }

    /// Encode and write a property
    pub async fn write<P: WritableProperty>(&self, value: &P::Value) -> Result<()> {
        let encoded = P::encode(value)?;
        self.client.set_data(P::PATH, "value", &encoded).await?;
        Ok(())
    }

    /// Send a transport control to the built-in player
    pub async fn control(&self, control: PlayerControl) -> Result<()> {
        debug!(host = %self.host, control = control.as_wire(), "Sending player control");
        self.client
            .set_data(
                PLAYER_CONTROL_PATH,
                "activate",
                &json!({ "control": control.as_wire() }),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SpeakerConnector for KefConnector {
    fn host(&self) -> &str {
        &self.host
    }

    async fn status(&self) -> Result<SpeakerStatus> {
        self.read::<PowerStatus>().await
    }

    async fn volume(&self) -> Result<u8> {
        self.read::<PlayerVolume>().await
    }

    async fn is_muted(&self) -> Result<bool> {
        self.read::<MuteState>().await
    }

    async fn source(&self) -> Result<String> {
        self.read::<PhysicalSource>().await
    }

    async fn speaker_name(&self) -> Result<String> {
        self.read::<DeviceName>().await
    }

    async fn song_status(&self) -> Result<SongStatus> {
        Ok(self.read::<PlayerData>().await?.status)
    }

    async fn song_information(&self) -> Result<SongInfo> {
        Ok(self.read::<PlayerData>().await?.info)
    }

    async fn player_state(&self) -> Result<PlayerState> {
        self.read::<PlayerData>().await
    }

    async fn power_on(&self) -> Result<()> {
        self.write::<PhysicalSource>(&SpeakerStatus::PowerOn.as_wire().to_string())
            .await
    }

    async fn power_off(&self) -> Result<()> {
        self.write::<PhysicalSource>(&SpeakerStatus::Standby.as_wire().to_string())
            .await
    }

    async fn play(&self) -> Result<()> {
        self.control(PlayerControl::Play).await
    }

    async fn pause(&self) -> Result<()> {
        self.control(PlayerControl::Pause).await
    }

    async fn next(&self) -> Result<()> {
        self.control(PlayerControl::Next).await
    }

    async fn prev(&self) -> Result<()> {
        self.control(PlayerControl::Previous).await
    }

    async fn mute(&self) -> Result<()> {
        self.write::<MuteState>(&true).await
    }

    async fn unmute(&self) -> Result<()> {
        self.write::<MuteState>(&false).await
    }

    async fn set_volume(&self, volume: u8) -> Result<()> {
        self.write::<PlayerVolume>(&volume).await
    }

    async fn set_source(&self, source: &str) -> Result<()> {
        self.write::<PhysicalSource>(&source.to_string()).await
    }
}
