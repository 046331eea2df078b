//! Voice Activity Detection: debounced speech-start / speech-end decisions.
//!
//! The detector watches a short-window amplitude reading and produces two
//! edge-triggered decisions:
//!
//! * **Speech start**: amplitude stays at or above the threshold continuously
//!   for at least `start_delay` while armed.
//! * **Speech end**: after a start, amplitude stays below the threshold
//!   continuously for at least `silence_duration`.
//!
//! Any break in continuity resets the running timer to zero. It is a
//! debounce, not a cumulative counter.

use std::time::Duration;

use parley_core::Settings;
use serde::{Deserialize, Serialize};

use crate::buffer::{AudioBuffer, frame_duration};

/// VAD configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VadConfig {
    /// Amplitude (0.0-1.0) at or above which a sample counts as voiced.
    pub threshold: f32,

    /// Continuous voice needed before speech start fires.
    pub start_delay: Duration,

    /// Continuous silence needed before speech end fires.
    pub silence_duration: Duration,
}

impl VadConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            threshold: settings.effective_voice_threshold(),
            start_delay: settings.effective_voice_start_delay(),
            silence_duration: settings.effective_silence_duration(),
        }
    }
}

impl Default for VadConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Current VAD state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadState {
    /// Not watching; readings are ignored.
    Disarmed,

    /// Waiting for sustained voice.
    AwaitingSpeech,

    /// Speech started; waiting for sustained silence.
    InSpeech,
}

/// Decisions emitted by the VAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadDecision {
    /// Open a recording clip.
    SpeechStart,

    /// Seal and dispatch the recording clip.
    SpeechEnd,
}

/// Amplitude-threshold voice activity detector.
#[derive(Debug, Clone)]
pub struct VoiceActivityDetector {
    config: VadConfig,
    state: VadState,
    voiced_for: Duration,
    silent_for: Duration,
    buffer: AudioBuffer,
    level: f32,
}

impl VoiceActivityDetector {
    pub fn new(config: VadConfig) -> Self {
        Self {
            config,
            state: VadState::Disarmed,
            voiced_for: Duration::ZERO,
            silent_for: Duration::ZERO,
            buffer: AudioBuffer::default(),
            level: 0.0,
        }
    }

    /// Start watching for speech. Resets both debounce timers.
    pub fn arm(&mut self) {
        self.state = VadState::AwaitingSpeech;
        self.reset_timers();
    }

    /// Stop watching. Readings are ignored until the next [`arm`](Self::arm).
    pub fn disarm(&mut self) {
        self.state = VadState::Disarmed;
        self.reset_timers();
        self.buffer.clear();
    }

    pub const fn state(&self) -> VadState {
        self.state
    }

    pub const fn config(&self) -> &VadConfig {
        &self.config
    }

    /// Most recent amplitude reading, for level meters.
    pub const fn level(&self) -> f32 {
        self.level
    }

    /// Feed a captured frame. The amplitude is the buffer's short-window mean
    /// after the frame is pushed; the frame's length is the elapsed time.
    pub fn process_frame(&mut self, frame: &[f32], sample_rate: u32) -> Option<VadDecision> {
        self.buffer.extend(frame);
        let amplitude = self.buffer.average_amplitude();
        self.observe(amplitude, frame_duration(frame.len(), sample_rate))
    }

    /// Feed one amplitude reading covering `elapsed` of audio.
    pub fn observe(&mut self, amplitude: f32, elapsed: Duration) -> Option<VadDecision> {
        self.level = amplitude.clamp(0.0, 1.0);
        let voiced = self.level >= self.config.threshold;

        match self.state {
            VadState::Disarmed => None,
            VadState::AwaitingSpeech => {
                if !voiced {
                    self.voiced_for = Duration::ZERO;
                    return None;
                }
                self.voiced_for += elapsed;
                if self.voiced_for < self.config.start_delay {
                    return None;
                }
                tracing::debug!(
                    voiced_ms = self.voiced_for.as_millis(),
                    level = self.level,
                    "VAD: speech start"
                );
                self.state = VadState::InSpeech;
                self.reset_timers();
                Some(VadDecision::SpeechStart)
            }
            VadState::InSpeech => {
                if voiced {
                    self.silent_for = Duration::ZERO;
                    return None;
                }
                self.silent_for += elapsed;
                if self.silent_for < self.config.silence_duration {
                    return None;
                }
                tracing::debug!(
                    silent_ms = self.silent_for.as_millis(),
                    "VAD: speech end"
                );
                self.state = VadState::Disarmed;
                self.reset_timers();
                Some(VadDecision::SpeechEnd)
            }
        }
    }

    fn reset_timers(&mut self) {
        self.voiced_for = Duration::ZERO;
        self.silent_for = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    fn detector(start_ms: u64, silence_ms: u64) -> VoiceActivityDetector {
        let mut vad = VoiceActivityDetector::new(VadConfig {
            threshold: 0.02,
            start_delay: Duration::from_millis(start_ms),
            silence_duration: Duration::from_millis(silence_ms),
        });
        vad.arm();
        vad
    }

    /// Index of the first reading that produced `decision`, if any.
    fn first(
        vad: &mut VoiceActivityDetector,
        readings: &[f32],
        decision: VadDecision,
    ) -> Option<usize> {
        readings
            .iter()
            .position(|&amp| vad.observe(amp, TICK) == Some(decision))
    }

    #[test]
    fn speech_starts_once_delay_is_reached() {
        let mut vad = detector(300, 2000);
        let at = first(&mut vad, &[0.0, 0.0, 0.05, 0.05, 0.05], VadDecision::SpeechStart);
        assert_eq!(at, Some(4));
        assert_eq!(vad.state(), VadState::InSpeech);
    }

    #[test]
    fn a_dip_resets_the_start_timer() {
        let mut vad = detector(300, 2000);
        let readings = [0.05, 0.05, 0.0, 0.05, 0.05, 0.05];
        assert_eq!(first(&mut vad, &readings, VadDecision::SpeechStart), Some(5));
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut vad = detector(100, 2000);
        assert_eq!(vad.observe(0.02, TICK), Some(VadDecision::SpeechStart));
    }

    #[test]
    fn speech_ends_after_continuous_silence() {
        let mut vad = detector(100, 300);
        assert_eq!(vad.observe(0.5, TICK), Some(VadDecision::SpeechStart));

        let readings = [0.0, 0.0, 0.5, 0.0, 0.0, 0.0];
        assert_eq!(first(&mut vad, &readings, VadDecision::SpeechEnd), Some(5));
        assert_eq!(vad.state(), VadState::Disarmed);
    }

    #[test]
    fn disarmed_detector_ignores_voice() {
        let mut vad = detector(100, 300);
        vad.disarm();
        for _ in 0..10 {
            assert_eq!(vad.observe(0.9, TICK), None);
        }
        assert!((vad.level() - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn frames_drive_the_same_debounce() {
        let mut vad = detector(300, 2000);
        let quiet = vec![0.0; 1600];
        let loud = vec![0.3; 1600];

        assert_eq!(vad.process_frame(&quiet, 16_000), None);
        assert_eq!(vad.process_frame(&loud, 16_000), None);
        assert_eq!(vad.process_frame(&loud, 16_000), None);
        assert_eq!(
            vad.process_frame(&loud, 16_000),
            Some(VadDecision::SpeechStart)
        );
    }

    #[test]
    fn rearming_after_speech_end_starts_over() {
        let mut vad = detector(100, 100);
        assert_eq!(vad.observe(0.5, TICK), Some(VadDecision::SpeechStart));
        assert_eq!(vad.observe(0.0, TICK), Some(VadDecision::SpeechEnd));
        assert_eq!(vad.observe(0.5, TICK), None);

        vad.arm();
        assert_eq!(vad.observe(0.5, TICK), Some(VadDecision::SpeechStart));
    }
}
