//! Settings domain types and validation.
//!
//! Every knob of the voice loop lives here. Fields are optional so a settings
//! file only needs to name what it changes; `effective_*` accessors fall back
//! to the defaults below.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::voice::VoiceName;

/// Default amplitude threshold for voice presence.
pub const DEFAULT_VOICE_THRESHOLD: f32 = 0.02;

/// Default silence required to end an utterance, in seconds.
pub const DEFAULT_SILENCE_DURATION_SECS: f32 = 2.0;

/// Default sustained voice required to start recording, in seconds.
pub const DEFAULT_VOICE_START_DELAY_SECS: f32 = 0.5;

/// Default capture sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Default hard cap on a single recording, in seconds.
pub const DEFAULT_MAX_RECORDING_SECS: u32 = 15;

/// Default extra pause after estimated speech, in seconds.
pub const DEFAULT_TTS_PAUSE_BUFFER_SECS: f32 = 1.0;

/// Default conversation log size.
pub const DEFAULT_MAX_CONVERSATION_LINES: u32 = 100;

/// Default number of archived recording clips.
pub const DEFAULT_MAX_ARCHIVED_CLIPS: u32 = 20;

/// Default dialogue gateway request timeout, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Application settings structure.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Amplitude at or above which the microphone counts as voiced (0.01-0.5).
    pub voice_threshold: Option<f32>,

    /// Continuous silence that ends an utterance, seconds (0.5-5).
    pub silence_duration_secs: Option<f32>,

    /// Continuous voice that starts a recording, seconds (0.01-3).
    pub voice_start_delay_secs: Option<f32>,

    /// Capture sample rate in Hz (8000-48000).
    pub sample_rate: Option<u32>,

    /// Hard cap on one recording, seconds (5-60).
    pub max_recording_secs: Option<u32>,

    /// Extra listening pause after the estimated speech length, seconds (0-5).
    pub tts_pause_buffer_secs: Option<f32>,

    /// Send sealed recordings to the recognizer automatically.
    pub auto_send: Option<bool>,

    /// Re-arm the microphone after every turn.
    pub continuous_listening: Option<bool>,

    /// Speak agent replies through the synthesizer.
    pub auto_speak_responses: Option<bool>,

    /// Conversation log size (10-1000).
    pub max_conversation_lines: Option<u32>,

    /// Archived recording clips kept in memory (1-200).
    pub max_archived_clips: Option<u32>,

    /// Prefix rendered log lines with the time of day.
    pub show_timestamps: Option<bool>,

    /// Dialogue gateway request timeout, seconds (5-60).
    pub request_timeout_secs: Option<u64>,

    /// Synthesis voice.
    pub voice: Option<VoiceName>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            voice_threshold: Some(DEFAULT_VOICE_THRESHOLD),
            silence_duration_secs: Some(DEFAULT_SILENCE_DURATION_SECS),
            voice_start_delay_secs: Some(DEFAULT_VOICE_START_DELAY_SECS),
            sample_rate: Some(DEFAULT_SAMPLE_RATE),
            max_recording_secs: Some(DEFAULT_MAX_RECORDING_SECS),
            tts_pause_buffer_secs: Some(DEFAULT_TTS_PAUSE_BUFFER_SECS),
            auto_send: Some(true),
            continuous_listening: Some(true),
            auto_speak_responses: Some(true),
            max_conversation_lines: Some(DEFAULT_MAX_CONVERSATION_LINES),
            max_archived_clips: Some(DEFAULT_MAX_ARCHIVED_CLIPS),
            show_timestamps: Some(true),
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            voice: Some(VoiceName::AaravIndia),
        }
    }

    pub fn effective_voice_threshold(&self) -> f32 {
        self.voice_threshold.unwrap_or(DEFAULT_VOICE_THRESHOLD)
    }

    pub fn effective_silence_duration(&self) -> Duration {
        secs(
            self.silence_duration_secs
                .unwrap_or(DEFAULT_SILENCE_DURATION_SECS),
        )
    }

    pub fn effective_voice_start_delay(&self) -> Duration {
        secs(
            self.voice_start_delay_secs
                .unwrap_or(DEFAULT_VOICE_START_DELAY_SECS),
        )
    }

    pub fn effective_sample_rate(&self) -> u32 {
        self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    pub fn effective_max_recording(&self) -> Duration {
        Duration::from_secs(u64::from(
            self.max_recording_secs.unwrap_or(DEFAULT_MAX_RECORDING_SECS),
        ))
    }

    pub fn effective_tts_pause_buffer(&self) -> Duration {
        secs(
            self.tts_pause_buffer_secs
                .unwrap_or(DEFAULT_TTS_PAUSE_BUFFER_SECS),
        )
    }

    pub fn effective_auto_send(&self) -> bool {
        self.auto_send.unwrap_or(true)
    }

    pub fn effective_continuous_listening(&self) -> bool {
        self.continuous_listening.unwrap_or(true)
    }

    pub fn effective_auto_speak_responses(&self) -> bool {
        self.auto_speak_responses.unwrap_or(true)
    }

    pub fn effective_max_conversation_lines(&self) -> usize {
        self.max_conversation_lines
            .unwrap_or(DEFAULT_MAX_CONVERSATION_LINES) as usize
    }

    pub fn effective_max_archived_clips(&self) -> usize {
        self.max_archived_clips
            .unwrap_or(DEFAULT_MAX_ARCHIVED_CLIPS) as usize
    }

    pub fn effective_show_timestamps(&self) -> bool {
        self.show_timestamps.unwrap_or(true)
    }

    pub fn effective_request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn effective_voice(&self) -> VoiceName {
        self.voice.unwrap_or_default()
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(threshold) = other.voice_threshold {
            self.voice_threshold = threshold;
        }
        if let Some(silence) = other.silence_duration_secs {
            self.silence_duration_secs = silence;
        }
        if let Some(delay) = other.voice_start_delay_secs {
            self.voice_start_delay_secs = delay;
        }
        if let Some(rate) = other.sample_rate {
            self.sample_rate = rate;
        }
        if let Some(max) = other.max_recording_secs {
            self.max_recording_secs = max;
        }
        if let Some(buffer) = other.tts_pause_buffer_secs {
            self.tts_pause_buffer_secs = buffer;
        }
        if let Some(auto_send) = other.auto_send {
            self.auto_send = auto_send;
        }
        if let Some(continuous) = other.continuous_listening {
            self.continuous_listening = continuous;
        }
        if let Some(auto_speak) = other.auto_speak_responses {
            self.auto_speak_responses = auto_speak;
        }
        if let Some(lines) = other.max_conversation_lines {
            self.max_conversation_lines = lines;
        }
        if let Some(clips) = other.max_archived_clips {
            self.max_archived_clips = clips;
        }
        if let Some(show) = other.show_timestamps {
            self.show_timestamps = show;
        }
        if let Some(timeout) = other.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(voice) = other.voice {
            self.voice = voice;
        }
    }
}

fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or_default()
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = reset field to its default
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub voice_threshold: Option<Option<f32>>,
    pub silence_duration_secs: Option<Option<f32>>,
    pub voice_start_delay_secs: Option<Option<f32>>,
    pub sample_rate: Option<Option<u32>>,
    pub max_recording_secs: Option<Option<u32>>,
    pub tts_pause_buffer_secs: Option<Option<f32>>,
    pub auto_send: Option<Option<bool>>,
    pub continuous_listening: Option<Option<bool>>,
    pub auto_speak_responses: Option<Option<bool>>,
    pub max_conversation_lines: Option<Option<u32>>,
    pub max_archived_clips: Option<Option<u32>>,
    pub show_timestamps: Option<Option<bool>>,
    pub request_timeout_secs: Option<Option<u64>>,
    pub voice: Option<Option<VoiceName>>,
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Voice threshold must be between 0.01 and 0.5, got {0}")]
    InvalidVoiceThreshold(f32),

    #[error("Silence duration must be between 0.5 and 5 seconds, got {0}")]
    InvalidSilenceDuration(f32),

    #[error("Voice start delay must be between 0.01 and 3 seconds, got {0}")]
    InvalidVoiceStartDelay(f32),

    #[error("Sample rate must be between 8000 and 48000 Hz, got {0}")]
    InvalidSampleRate(u32),

    #[error("Max recording length must be between 5 and 60 seconds, got {0}")]
    InvalidMaxRecording(u32),

    #[error("TTS pause buffer must be between 0 and 5 seconds, got {0}")]
    InvalidPauseBuffer(f32),

    #[error("Max conversation lines must be between 10 and 1000, got {0}")]
    InvalidConversationLines(u32),

    #[error("Max archived clips must be between 1 and 200, got {0}")]
    InvalidArchivedClips(u32),

    #[error("Request timeout must be between 5 and 60 seconds, got {0}")]
    InvalidRequestTimeout(u64),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(threshold) = settings.voice_threshold {
        if !(0.01..=0.5).contains(&threshold) {
            return Err(SettingsError::InvalidVoiceThreshold(threshold));
        }
    }

    if let Some(silence) = settings.silence_duration_secs {
        if !(0.5..=5.0).contains(&silence) {
            return Err(SettingsError::InvalidSilenceDuration(silence));
        }
    }

    if let Some(delay) = settings.voice_start_delay_secs {
        if !(0.01..=3.0).contains(&delay) {
            return Err(SettingsError::InvalidVoiceStartDelay(delay));
        }
    }

    if let Some(rate) = settings.sample_rate {
        if !(8_000..=48_000).contains(&rate) {
            return Err(SettingsError::InvalidSampleRate(rate));
        }
    }

    if let Some(max) = settings.max_recording_secs {
        if !(5..=60).contains(&max) {
            return Err(SettingsError::InvalidMaxRecording(max));
        }
    }

    if let Some(buffer) = settings.tts_pause_buffer_secs {
        if !(0.0..=5.0).contains(&buffer) {
            return Err(SettingsError::InvalidPauseBuffer(buffer));
        }
    }

    if let Some(lines) = settings.max_conversation_lines {
        if !(10..=1000).contains(&lines) {
            return Err(SettingsError::InvalidConversationLines(lines));
        }
    }

    if let Some(clips) = settings.max_archived_clips {
        if !(1..=200).contains(&clips) {
            return Err(SettingsError::InvalidArchivedClips(clips));
        }
    }

    if let Some(timeout) = settings.request_timeout_secs {
        if !(5..=60).contains(&timeout) {
            return Err(SettingsError::InvalidRequestTimeout(timeout));
        }
    }

    Ok(())
}
