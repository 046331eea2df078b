//! Audio payloads that cross the port boundaries.

use std::time::Duration;

/// A recording trimmed to its captured length and closed for writes.
///
/// Samples are mono f32 PCM in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SealedClip {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SealedClip {
    /// Wrap captured samples. Callers guarantee `samples` is non-empty.
    pub const fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback length of the clip.
    pub fn duration(&self) -> Duration {
        samples_to_duration(self.samples.len(), self.sample_rate)
    }
}

/// Audio returned by a synthesis client.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    /// Mono f32 PCM samples.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl SynthesizedAudio {
    /// Playback length of the audio.
    pub fn duration(&self) -> Duration {
        samples_to_duration(self.samples.len(), self.sample_rate)
    }
}

#[allow(clippy::cast_precision_loss)]
fn samples_to_duration(len: usize, sample_rate: u32) -> Duration {
    if sample_rate == 0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(len as f64 / f64::from(sample_rate))
}
