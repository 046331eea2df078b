//! Rolling sample buffer used for the VAD's amplitude reading.

use std::time::Duration;

/// Samples considered when computing the short-window amplitude.
pub const AMPLITUDE_WINDOW: usize = 128;

/// Fixed-capacity ring of the most recently captured samples.
///
/// Only used to compute a short-window average amplitude; it is overwritten
/// continuously and never handed to anyone else.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    ring: Vec<f32>,
    head: usize,
    filled: usize,
}

impl AudioBuffer {
    /// Create an empty buffer holding up to `capacity` samples (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: vec![0.0; capacity.max(1)],
            head: 0,
            filled: 0,
        }
    }

    pub fn push(&mut self, sample: f32) {
        self.ring[self.head] = sample;
        self.head = (self.head + 1) % self.ring.len();
        self.filled = (self.filled + 1).min(self.ring.len());
    }

    pub fn extend(&mut self, samples: &[f32]) {
        // Only the tail can survive in the ring.
        let skip = samples.len().saturating_sub(self.ring.len());
        for &sample in &samples[skip..] {
            self.push(sample);
        }
    }

    /// Mean absolute value of the buffered samples, clamped to `[0, 1]`.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_amplitude(&self) -> f32 {
        if self.filled == 0 {
            return 0.0;
        }
        let sum: f32 = self.ring[..self.filled].iter().map(|s| s.abs()).sum();
        (sum / self.filled as f32).clamp(0.0, 1.0)
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.filled = 0;
    }

    pub const fn len(&self) -> usize {
        self.filled
    }

    pub const fn is_empty(&self) -> bool {
        self.filled == 0
    }
}

impl Default for AudioBuffer {
    fn default() -> Self {
        Self::new(AMPLITUDE_WINDOW)
    }
}

/// Exact playback length of `len` samples at `sample_rate`.
pub fn frame_duration(len: usize, sample_rate: u32) -> Duration {
    if sample_rate == 0 {
        return Duration::ZERO;
    }
    let nanos = (len as u128 * 1_000_000_000) / u128::from(sample_rate);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
