//! Recording in-memory speaker for entity and integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use kef_sdk::{
    ApiError, ClientConfig, ConnectorFactory, SongInfo, SongStatus, SpeakerConnector, SpeakerStatus,
};
use parking_lot::Mutex;

#[derive(Debug, Clone)]
pub struct SpeakerState {
    pub status: SpeakerStatus,
    pub volume: u8,
    pub muted: bool,
    pub source: String,
    pub speaker_name: String,
    pub song_status: SongStatus,
    pub song_info: SongInfo,
}

impl Default for SpeakerState {
    fn default() -> Self {
        Self {
            status: SpeakerStatus::PowerOn,
            volume: 40,
            muted: false,
            source: "wifi".to_string(),
            speaker_name: "Living Room".to_string(),
            song_status: SongStatus::Playing,
            song_info: SongInfo {
                title: Some("X".to_string()),
                artist: Some("Y".to_string()),
                album: Some("Z".to_string()),
                cover_url: Some("http://speaker/art.jpg".to_string()),
            },
        }
    }
}

/// Speaker that records every command and can fail reads or commands
pub struct RecordingConnector {
    host: String,
    state: Mutex<SpeakerState>,
    commands: Mutex<Vec<String>>,
    read_error: Mutex<Option<ApiError>>,
    command_error: Mutex<Option<ApiError>>,
    name_reads: AtomicUsize,
    status_reads: AtomicUsize,
}

impl RecordingConnector {
    pub fn new(host: &str) -> Self {
        Self::with_state(host, SpeakerState::default())
    }

    pub fn with_state(host: &str, state: SpeakerState) -> Self {
        Self {
            host: host.to_string(),
            state: Mutex::new(state),
            commands: Mutex::new(Vec::new()),
            read_error: Mutex::new(None),
            command_error: Mutex::new(None),
            name_reads: AtomicUsize::new(0),
            status_reads: AtomicUsize::new(0),
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut SpeakerState)) {
        f(&mut self.state.lock());
    }

    pub fn fail_reads(&self, error: Option<ApiError>) {
        *self.read_error.lock() = error;
    }

    pub fn fail_commands(&self, error: Option<ApiError>) {
        *self.command_error.lock() = error;
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }

    /// Completed or attempted refresh cycles (each starts with a status read)
    pub fn refreshes(&self) -> usize {
        self.status_reads.load(Ordering::SeqCst)
    }

    pub fn name_reads(&self) -> usize {
        self.name_reads.load(Ordering::SeqCst)
    }

    fn read<T>(&self, f: impl FnOnce(&SpeakerState) -> T) -> Result<T, ApiError> {
        match self.read_error.lock().clone() {
            Some(error) => Err(error),
            None => Ok(f(&self.state.lock())),
        }
    }

    fn command(&self, name: String, apply: impl FnOnce(&mut SpeakerState)) -> Result<(), ApiError> {
        if let Some(error) = self.command_error.lock().clone() {
            return Err(error);
        }
        self.commands.lock().push(name);
        apply(&mut self.state.lock());
        Ok(())
    }
}

#[async_trait]
impl SpeakerConnector for RecordingConnector {
    fn host(&self) -> &str {
        &self.host
    }

    async fn status(&self) -> Result<SpeakerStatus, ApiError> {
        self.status_reads.fetch_add(1, Ordering::SeqCst);
        self.read(|s| s.status)
    }

    async fn volume(&self) -> Result<u8, ApiError> {
        self.read(|s| s.volume)
    }

    async fn is_muted(&self) -> Result<bool, ApiError> {
        self.read(|s| s.muted)
    }

    async fn source(&self) -> Result<String, ApiError> {
        self.read(|s| s.source.clone())
    }

    async fn speaker_name(&self) -> Result<String, ApiError> {
        self.name_reads.fetch_add(1, Ordering::SeqCst);
        self.read(|s| s.speaker_name.clone())
    }

    async fn song_status(&self) -> Result<SongStatus, ApiError> {
        self.read(|s| s.song_status.clone())
    }

    async fn song_information(&self) -> Result<SongInfo, ApiError> {
        self.read(|s| s.song_info.clone())
    }

    async fn power_on(&self) -> Result<(), ApiError> {
        self.command("power_on".to_string(), |s| s.status = SpeakerStatus::PowerOn)
    }

    async fn power_off(&self) -> Result<(), ApiError> {
        self.command("power_off".to_string(), |s| s.status = SpeakerStatus::Standby)
    }

    async fn play(&self) -> Result<(), ApiError> {
        self.command("play".to_string(), |s| s.song_status = SongStatus::Playing)
    }

    async fn pause(&self) -> Result<(), ApiError> {
        self.command("pause".to_string(), |s| s.song_status = SongStatus::Paused)
    }

    async fn next(&self) -> Result<(), ApiError> {
        self.command("next".to_string(), |_| {})
    }

    async fn prev(&self) -> Result<(), ApiError> {
        self.command("prev".to_string(), |_| {})
    }

    async fn mute(&self) -> Result<(), ApiError> {
        self.command("mute".to_string(), |s| s.muted = true)
    }

    async fn unmute(&self) -> Result<(), ApiError> {
        self.command("unmute".to_string(), |s| s.muted = false)
    }

    async fn set_volume(&self, volume: u8) -> Result<(), ApiError> {
        self.command(format!("set_volume:{}", volume), |s| s.volume = volume)
    }

    async fn set_source(&self, source: &str) -> Result<(), ApiError> {
        let key = source.to_string();
        self.command(format!("set_source:{}", source), move |s| s.source = key)
    }
}

/// Factory handing out pre-built connectors by host
///
/// Hosts without a registered connector fail with a network error, like an
/// unreachable speaker would.
pub struct MockSpeakers {
    speakers: Mutex<Vec<Arc<RecordingConnector>>>,
    factory_calls: AtomicUsize,
}

impl MockSpeakers {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            speakers: Mutex::new(Vec::new()),
            factory_calls: AtomicUsize::new(0),
        })
    }

    pub fn add(&self, host: &str) -> Arc<RecordingConnector> {
        let connector = Arc::new(RecordingConnector::new(host));
        self.speakers.lock().push(Arc::clone(&connector));
        connector
    }

    pub fn factory_calls(&self) -> usize {
        self.factory_calls.load(Ordering::SeqCst)
    }

    pub fn factory(self: &Arc<Self>) -> ConnectorFactory {
        let speakers = Arc::clone(self);
        Arc::new(
            move |host: &str, _client: &ClientConfig| -> Result<Arc<dyn SpeakerConnector>, ApiError> {
                speakers.factory_calls.fetch_add(1, Ordering::SeqCst);
                speakers
                    .speakers
                    .lock()
                    .iter()
                    .find(|c| c.host() == host)
                    .map(|c| Arc::clone(c) as Arc<dyn SpeakerConnector>)
                    .ok_or_else(|| ApiError::NetworkError(format!("no route to {}", host)))
            },
        )
    }
}
