//! Scriptable in-memory speaker for coordinator tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kef_api::{ApiError, Result, SongInfo, SongStatus, SpeakerConnector, SpeakerStatus};
use parking_lot::Mutex;

/// One readable field of the speaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Status,
    Volume,
    Muted,
    Source,
    SpeakerName,
    SongStatus,
    SongInfo,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Status,
        Field::Volume,
        Field::Muted,
        Field::Source,
        Field::SpeakerName,
        Field::SongStatus,
        Field::SongInfo,
    ];
}

/// Values the mock answers with
#[derive(Debug, Clone)]
pub struct SpeakerValues {
    pub status: SpeakerStatus,
    pub volume: u8,
    pub muted: bool,
    pub source: String,
    pub speaker_name: String,
    pub song_status: SongStatus,
    pub song_info: SongInfo,
}

impl Default for SpeakerValues {
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
                album: None,
                cover_url: None,
            },
        }
    }
}

/// Mock connector with per-field failure injection and optional latency
///
/// Every read passes through [`MockConnector::enter`], which tracks how many
/// reads overlap. Reads within one fetch batch are sequential, so more than
/// one overlapping read means more than one batch was in flight.
pub struct MockConnector {
    host: String,
    values: Mutex<SpeakerValues>,
    failures: Mutex<HashMap<Field, ApiError>>,
    latency: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    batches: AtomicUsize,
    reads: AtomicUsize,
}

impl MockConnector {
    pub fn new(host: &str) -> Self {
        Self::with_values(host, SpeakerValues::default())
    }

    pub fn with_values(host: &str, values: SpeakerValues) -> Self {
        Self {
            host: host.to_string(),
            values: Mutex::new(values),
            failures: Mutex::new(HashMap::new()),
            latency: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            batches: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn set_values(&self, values: SpeakerValues) {
        *self.values.lock() = values;
    }

    pub fn update(&self, f: impl FnOnce(&mut SpeakerValues)) {
        f(&mut self.values.lock());
    }

    pub fn fail(&self, field: Field, error: ApiError) {
        self.failures.lock().insert(field, error);
    }

    pub fn heal(&self) {
        self.failures.lock().clear();
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    /// Fetch batches started (every batch reads status first)
    pub fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn enter<T>(&self, field: Field, read: impl FnOnce(&SpeakerValues) -> T) -> Result<T> {
        if field == Field::Status {
            self.batches.fetch_add(1, Ordering::SeqCst);
        }
        self.reads.fetch_add(1, Ordering::SeqCst);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let failure = self.failures.lock().get(&field).cloned();
        let result = match failure {
            Some(error) => Err(error),
            None => Ok(read(&self.values.lock())),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[async_trait]
impl SpeakerConnector for MockConnector {
    fn host(&self) -> &str {
        &self.host
    }

    async fn status(&self) -> Result<SpeakerStatus> {
        self.enter(Field::Status, |v| v.status).await
    }

    async fn volume(&self) -> Result<u8> {
        self.enter(Field::Volume, |v| v.volume).await
    }

    async fn is_muted(&self) -> Result<bool> {
        self.enter(Field::Muted, |v| v.muted).await
    }

    async fn source(&self) -> Result<String> {
        self.enter(Field::Source, |v| v.source.clone()).await
    }

    async fn speaker_name(&self) -> Result<String> {
        self.enter(Field::SpeakerName, |v| v.speaker_name.clone()).await
    }

    async fn song_status(&self) -> Result<SongStatus> {
        self.enter(Field::SongStatus, |v| v.song_status.clone()).await
    }

    async fn song_information(&self) -> Result<SongInfo> {
        self.enter(Field::SongInfo, |v| v.song_info.clone()).await
    }

    async fn power_on(&self) -> Result<()> {
        self.update(|v| v.status = SpeakerStatus::PowerOn);
        Ok(())
    }

    async fn power_off(&self) -> Result<()> {
        self.update(|v| v.status = SpeakerStatus::Standby);
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        self.update(|v| v.song_status = SongStatus::Playing);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.update(|v| v.song_status = SongStatus::Paused);
        Ok(())
    }

    async fn next(&self) -> Result<()> {
        Ok(())
    }

    async fn prev(&self) -> Result<()> {
        Ok(())
    }

    async fn mute(&self) -> Result<()> {
        self.update(|v| v.muted = true);
        Ok(())
    }

    async fn unmute(&self) -> Result<()> {
        self.update(|v| v.muted = false);
        Ok(())
    }

    async fn set_volume(&self, volume: u8) -> Result<()> {
        self.update(|v| v.volume = volume);
        Ok(())
    }

    async fn set_source(&self, source: &str) -> Result<()> {
        self.update(|v| v.source = source.to_string());
        Ok(())
    }
}
