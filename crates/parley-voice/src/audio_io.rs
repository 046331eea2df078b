//! `AudioSource` and `AudioSink` abstractions for the conversation driver.
//!
//! The driver pulls fixed-size frames from a source on every tick and pushes
//! synthesized replies into a sink:
//!
//! | Implementor | Where used |
//! |---|---|
//! | [`BufferedSource`] | Tests and file-backed runs (`parley converse --input`) |
//! | [`NullSink`] | Runs without playback |
//! | `WavDirSink` (`parley-cli`) | Writes every reply to a numbered WAV file |
//!
//! Both traits are object-safe and take `&self`; implementations use interior
//! mutability for their state.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use parley_core::{SynthesizedAudio, TurnError};

use crate::microphone::MicrophoneMode;

// ── AudioSource ────────────────────────────────────────────────────

/// Abstraction over an audio input (microphone capture).
pub trait AudioSource: Send + Sync {
    /// Follow the microphone lease. A released source produces no frames.
    fn set_mode(&self, mode: MicrophoneMode) -> Result<(), TurnError>;

    /// Read the next frame of mono f32 PCM.
    ///
    /// Returns `Ok(None)` if no frame is ready (or the source is released).
    fn read_frame(&self) -> Result<Option<Vec<f32>>, TurnError>;

    /// Whether the source will never produce another frame.
    fn is_exhausted(&self) -> bool;
}

// ── AudioSink ──────────────────────────────────────────────────────

/// Abstraction over an audio output (reply playback).
pub trait AudioSink: Send + Sync {
    /// Queue synthesized audio for playback.
    fn play(&self, audio: SynthesizedAudio) -> Result<(), TurnError>;

    /// Stop playback immediately.
    fn stop(&self) -> Result<(), TurnError>;
}

// ── BufferedSource ─────────────────────────────────────────────────

/// In-memory source that replays queued samples frame by frame.
///
/// Samples are consumed only while the microphone is leased, so audio queued
/// for the user's next turn waits while the agent is thinking or speaking.
#[derive(Debug)]
pub struct BufferedSource {
    frame_len: usize,
    inner: Mutex<BufferedInner>,
}

#[derive(Debug)]
struct BufferedInner {
    samples: VecDeque<f32>,
    mode: MicrophoneMode,
}

impl BufferedSource {
    /// Empty source producing frames of `frame_len` samples (at least one).
    pub fn new(frame_len: usize) -> Self {
        Self {
            frame_len: frame_len.max(1),
            inner: Mutex::new(BufferedInner {
                samples: VecDeque::new(),
                mode: MicrophoneMode::Released,
            }),
        }
    }

    /// Source preloaded with `samples`.
    pub fn with_samples(frame_len: usize, samples: impl IntoIterator<Item = f32>) -> Self {
        let source = Self::new(frame_len);
        source.push_samples(samples);
        source
    }

    /// Append more samples at the end of the queue.
    pub fn push_samples(&self, samples: impl IntoIterator<Item = f32>) {
        lock(&self.inner).samples.extend(samples);
    }

    /// Samples not yet read.
    pub fn remaining(&self) -> usize {
        lock(&self.inner).samples.len()
    }

    pub const fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn mode(&self) -> MicrophoneMode {
        lock(&self.inner).mode
    }
}

impl AudioSource for BufferedSource {
    fn set_mode(&self, mode: MicrophoneMode) -> Result<(), TurnError> {
        lock(&self.inner).mode = mode;
        Ok(())
    }

    fn read_frame(&self) -> Result<Option<Vec<f32>>, TurnError> {
        let mut inner = lock(&self.inner);
        if inner.mode == MicrophoneMode::Released || inner.samples.is_empty() {
            return Ok(None);
        }
        let take = self.frame_len.min(inner.samples.len());
        Ok(Some(inner.samples.drain(..take).collect()))
    }

    fn is_exhausted(&self) -> bool {
        lock(&self.inner).samples.is_empty()
    }
}

// ── NullSink ───────────────────────────────────────────────────────

/// Sink that discards everything it is given.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&self, audio: SynthesizedAudio) -> Result<(), TurnError> {
        tracing::trace!(
            samples = audio.samples.len(),
            sample_rate = audio.sample_rate,
            "Discarding synthesized audio"
        );
        Ok(())
    }

    fn stop(&self) -> Result<(), TurnError> {
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_source_does_not_advance() {
        let source = BufferedSource::with_samples(4, vec![0.1; 10]);
        assert_eq!(source.read_frame().unwrap(), None);
        assert_eq!(source.remaining(), 10);
    }

    #[test]
    fn frames_are_fixed_size_except_the_last() {
        let source = BufferedSource::with_samples(4, vec![0.1; 10]);
        source.set_mode(MicrophoneMode::Monitoring).unwrap();

        let lens: Vec<usize> = std::iter::from_fn(|| source.read_frame().unwrap())
            .map(|f| f.len())
            .collect();
        assert_eq!(lens, vec![4, 4, 2]);
        assert!(source.is_exhausted());
    }

    #[test]
    fn pushed_samples_follow_queued_ones() {
        let source = BufferedSource::with_samples(2, vec![0.1, 0.2]);
        source.push_samples(vec![0.3]);
        source.set_mode(MicrophoneMode::Recording).unwrap();

        assert_eq!(source.read_frame().unwrap(), Some(vec![0.1, 0.2]));
        assert_eq!(source.read_frame().unwrap(), Some(vec![0.3]));
        assert_eq!(source.read_frame().unwrap(), None);
    }

    #[test]
    fn zero_frame_len_is_clamped() {
        assert_eq!(BufferedSource::new(0).frame_len(), 1);
    }
}
