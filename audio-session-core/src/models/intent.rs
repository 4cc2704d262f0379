use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::SessionError;

/// Audio session category: which directions of audio the app needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionCategory {
    Ambient,
    SoloAmbient,
    Playback,
    Record,
    /// Simultaneous record and playback.
    PlayAndRecord,
    MultiRoute,
}

impl SessionCategory {
    /// Whether input and output can run concurrently in this category.
    pub fn is_duplex(self) -> bool {
        matches!(self, Self::PlayAndRecord | Self::MultiRoute)
    }
}

impl fmt::Display for SessionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ambient => "ambient",
            Self::SoloAmbient => "solo_ambient",
            Self::Playback => "playback",
            Self::Record => "record",
            Self::PlayAndRecord => "play_and_record",
            Self::MultiRoute => "multi_route",
        };
        f.write_str(name)
    }
}

/// Signal-path tuning requested from the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Default,
    /// Two-way voice: echo cancellation and voice-tuned gain.
    VoiceChat,
    VideoChat,
    GameChat,
    Measurement,
    SpokenAudio,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::VoiceChat => "voice_chat",
            Self::VideoChat => "video_chat",
            Self::GameChat => "game_chat",
            Self::Measurement => "measurement",
            Self::SpokenAudio => "spoken_audio",
        };
        f.write_str(name)
    }
}

/// Routing and mixing flags attached to the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryOptions {
    pub mix_with_others: bool,
    pub duck_others: bool,
    /// Permit routing to Bluetooth hands-free headsets.
    pub allow_bluetooth: bool,
    pub allow_bluetooth_a2dp: bool,
    pub allow_air_play: bool,
    /// Route output to the loudspeaker instead of the receiver.
    pub default_to_speaker: bool,
}

impl CategoryOptions {
    /// No flags set.
    pub const NONE: Self = Self {
        mix_with_others: false,
        duck_others: false,
        allow_bluetooth: false,
        allow_bluetooth_a2dp: false,
        allow_air_play: false,
        default_to_speaker: false,
    };

    /// Names of the flags that are set, in declaration order.
    pub fn enabled(&self) -> Vec<&'static str> {
        [
            (self.mix_with_others, "mix_with_others"),
            (self.duck_others, "duck_others"),
            (self.allow_bluetooth, "allow_bluetooth"),
            (self.allow_bluetooth_a2dp, "allow_bluetooth_a2dp"),
            (self.allow_air_play, "allow_air_play"),
            (self.default_to_speaker, "default_to_speaker"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

impl Default for CategoryOptions {
    fn default() -> Self {
        Self {
            allow_bluetooth: true,
            default_to_speaker: true,
            ..Self::NONE
        }
    }
}

/// The session configuration requested at launch.
///
/// A preference, not a guarantee: the OS may substitute the nearest values it
/// supports. What was actually granted is read back into `SessionParameters`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSessionIntent {
    /// Default: `PlayAndRecord`.
    pub category: SessionCategory,

    /// Default: `VoiceChat`.
    pub mode: SessionMode,

    /// Default: `default_to_speaker` + `allow_bluetooth`.
    pub options: CategoryOptions,

    /// Target latency per I/O buffer in seconds (default: 0.003).
    pub preferred_io_buffer_duration_secs: f64,

    /// Target hardware sample rate in Hz (default: 16000).
    pub preferred_sample_rate_hz: f64,
}

impl AudioSessionIntent {
    pub fn validate(&self) -> Result<(), SessionError> {
        let buffer = self.preferred_io_buffer_duration_secs;
        if !buffer.is_finite() || buffer <= 0.0 {
            return Err(SessionError::InvalidIntent(format!(
                "buffer duration must be positive, got {buffer}"
            )));
        }
        let rate = self.preferred_sample_rate_hz;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(SessionError::InvalidIntent(format!(
                "sample rate must be positive, got {rate}"
            )));
        }
        if self.options.default_to_speaker && self.category != SessionCategory::PlayAndRecord {
            return Err(SessionError::InvalidIntent(format!(
                "default_to_speaker requires play_and_record, got {}",
                self.category
            )));
        }
        Ok(())
    }

    pub fn is_duplex(&self) -> bool {
        self.category.is_duplex()
    }

    /// Parse an intent from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, SessionError> {
        let intent: Self =
            serde_json::from_str(json).map_err(|e| SessionError::InvalidConfig(e.to_string()))?;
        intent.validate()?;
        Ok(intent)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SessionError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }
}

impl Default for AudioSessionIntent {
    fn default() -> Self {
        Self {
            category: SessionCategory::PlayAndRecord,
            mode: SessionMode::VoiceChat,
            options: CategoryOptions::default(),
            preferred_io_buffer_duration_secs: 0.003,
            preferred_sample_rate_hz: 16000.0,
        }
    }
}
