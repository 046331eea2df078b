//! Resolved configuration for the turn coordinator.

use std::time::Duration;

use parley_core::{Settings, VoiceName};
use serde::Serialize;

use crate::vad::VadConfig;

/// Window within which an identical utterance counts as a duplicate.
pub const DUPLICATE_WINDOW: Duration = Duration::from_secs(2);

/// Turn coordinator configuration, resolved from [`Settings`].
#[derive(Debug, Clone, Serialize)]
pub struct TurnConfig {
    pub vad: VadConfig,
    pub sample_rate: u32,
    pub max_recording: Duration,
    /// Added to every reply's estimated spoken length.
    pub tts_pause_buffer: Duration,
    /// Dispatch sealed clips to the recognizer.
    pub auto_send: bool,
    /// Re-arm the microphone after each turn ("conversation mode").
    pub continuous_listening: bool,
    /// Speak agent replies.
    pub auto_speak: bool,
    pub max_conversation_lines: usize,
    pub max_archived_clips: usize,
    pub duplicate_window: Duration,
    pub voice: VoiceName,
}

impl TurnConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            vad: VadConfig::from_settings(settings),
            sample_rate: settings.effective_sample_rate(),
            max_recording: settings.effective_max_recording(),
            tts_pause_buffer: settings.effective_tts_pause_buffer(),
            auto_send: settings.effective_auto_send(),
            continuous_listening: settings.effective_continuous_listening(),
            auto_speak: settings.effective_auto_speak_responses(),
            max_conversation_lines: settings.effective_max_conversation_lines(),
            max_archived_clips: settings.effective_max_archived_clips(),
            duplicate_window: DUPLICATE_WINDOW,
            voice: settings.effective_voice(),
        }
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::with_defaults())
    }
}
