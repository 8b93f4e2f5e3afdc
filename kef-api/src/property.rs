use serde_json::{json, Value};

use crate::error::{ApiError, Result};
use crate::types::{PlayerState, SongInfo, SongStatus, SpeakerStatus};

/// Base trait for every readable speaker property
///
/// Each property names the API path it lives at and knows how to decode the
/// typed value object the speaker returns for that path. Keeping the table
/// here means the connector itself never deals with JSON shapes.
pub trait KefProperty {
    /// Decoded value type
    type Value;

    /// Path passed to `getData` / `setData`
    const PATH: &'static str;

    /// Decode the value object returned by `getData`
    fn decode(raw: &Value) -> Result<Self::Value>;
}

/// A property that can also be written through `setData`
pub trait WritableProperty: KefProperty {
    /// Encode a value as the JSON object expected by `setData`
    fn encode(value: &Self::Value) -> Result<Value>;
}

/// Friendly device name, e.g. "Living Room LSX II"
pub struct DeviceName;

/// Power status (`powerOn` / `standby`)
pub struct PowerStatus;

/// Selected physical input; writing `powerOn` or `standby` switches power
pub struct PhysicalSource;

/// Master volume, 0-100
pub struct PlayerVolume;

/// Mute flag
pub struct MuteState;

/// Player state and current track metadata
pub struct PlayerData;

/// Path used for transport controls (role `activate`)
pub const PLAYER_CONTROL_PATH: &str = "player:player/control";

impl KefProperty for DeviceName {
    type Value = String;
    const PATH: &'static str = "settings:/deviceName";

    fn decode(raw: &Value) -> Result<String> {
        typed_str(raw, "string_").map(str::to_string)
    }
}

impl KefProperty for PowerStatus {
    type Value = SpeakerStatus;
    const PATH: &'static str = "settings:/kef/host/speakerStatus";

    fn decode(raw: &Value) -> Result<SpeakerStatus> {
        typed_str(raw, "kefSpeakerStatus").map(SpeakerStatus::from_wire)
    }
}

impl KefProperty for PhysicalSource {
    type Value = String;
    const PATH: &'static str = "settings:/kef/play/physicalSource";

    fn decode(raw: &Value) -> Result<String> {
        typed_str(raw, "kefPhysicalSource").map(str::to_string)
    }
}

impl WritableProperty for PhysicalSource {
    fn encode(value: &String) -> Result<Value> {
        if value.trim().is_empty() {
            return Err(ApiError::InvalidParameter("source must not be empty".to_string()));
        }
        Ok(json!({ "type": "kefPhysicalSource", "kefPhysicalSource": value }))
    }
}

impl KefProperty for PlayerVolume {
    type Value = u8;
    const PATH: &'static str = "player:volume";

    fn decode(raw: &Value) -> Result<u8> {
        let volume = raw
            .get("i32_")
            .and_then(Value::as_i64)
            .ok_or_else(|| missing("i32_", raw))?;
        u8::try_from(volume)
            .ok()
            .filter(|v| *v <= 100)
            .ok_or_else(|| ApiError::ParseError(format!("volume {} out of range [0, 100]", volume)))
    }
}

impl WritableProperty for PlayerVolume {
    fn encode(value: &u8) -> Result<Value> {
        if *value > 100 {
            return Err(ApiError::InvalidParameter(format!(
                "volume {} is out of range [0, 100]",
                value
            )));
        }
        Ok(json!({ "type": "i32_", "i32_": value }))
    }
}

impl KefProperty for MuteState {
    type Value = bool;
    const PATH: &'static str = "settings:/mediaPlayer/mute";

    fn decode(raw: &Value) -> Result<bool> {
        raw.get("bool_")
            .and_then(Value::as_bool)
            .ok_or_else(|| missing("bool_", raw))
    }
}

impl WritableProperty for MuteState {
    fn encode(value: &bool) -> Result<Value> {
        Ok(json!({ "type": "bool_", "bool_": value }))
    }
}

impl KefProperty for PlayerData {
    type Value = PlayerState;
    const PATH: &'static str = "player:player/data";

    fn decode(raw: &Value) -> Result<PlayerState> {
        if !raw.is_object() {
            return Err(ApiError::ParseError(format!("player data is not an object: {}", raw)));
        }

        // An idle player omits `state` entirely
        let status = raw
            .get("state")
            .and_then(Value::as_str)
            .map(SongStatus::from_wire)
            .unwrap_or_else(|| SongStatus::Other(String::new()));

        let track = raw.get("trackRoles");
        let metadata = track
            .and_then(|t| t.get("mediaData"))
            .and_then(|m| m.get("metaData"));

        let info = SongInfo {
            title: optional_str(track, "title"),
            artist: optional_str(metadata, "artist"),
            album: optional_str(metadata, "album"),
            cover_url: optional_str(track, "icon"),
        };

        Ok(PlayerState { status, info })
    }
}

fn typed_str<'a>(raw: &'a Value, field: &str) -> Result<&'a str> {
    raw.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| missing(field, raw))
}

fn optional_str(parent: Option<&Value>, field: &str) -> Option<String> {
    parent
        .and_then(|p| p.get(field))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn missing(field: &str, raw: &Value) -> ApiError {
    ApiError::ParseError(format!("missing field '{}' in {}", field, raw))
}
