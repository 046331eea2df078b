//! Recording session: owns the single in-flight audio capture.
//!
//! Mirrors the allowed transitions of the coordinator: a clip may only be
//! opened when none is open, and sealing consumes it. A duration cap forces
//! a seal on stuck-open microphones.

use std::time::{Duration, Instant};

use parley_core::{SealedClip, Settings, TurnError};

/// Result of appending a frame to the open clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStatus {
    /// The clip can take more samples.
    Open,

    /// The clip reached its maximum length; it must be sealed now.
    Full,

    /// No clip is open; the frame was dropped.
    Closed,
}

/// An open, append-only capture buffer.
#[derive(Debug)]
pub struct RecordingClip {
    samples: Vec<f32>,
    capacity: usize,
    opened_at: Instant,
}

impl RecordingClip {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub const fn opened_at(&self) -> Instant {
        self.opened_at
    }
}

/// Holds at most one open [`RecordingClip`].
#[derive(Debug)]
pub struct RecordingSession {
    sample_rate: u32,
    max_duration: Duration,
    open: Option<RecordingClip>,
}

impl RecordingSession {
    pub const fn new(sample_rate: u32, max_duration: Duration) -> Self {
        Self {
            sample_rate,
            max_duration,
            open: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.effective_sample_rate(),
            settings.effective_max_recording(),
        )
    }

    /// Open a new clip at `now`.
    pub fn open(&mut self, now: Instant) -> Result<(), TurnError> {
        if self.open.is_some() {
            return Err(TurnError::AlreadyRecording);
        }
        let capacity = self.capacity();
        self.open = Some(RecordingClip {
            samples: Vec::with_capacity(capacity.min(self.sample_rate as usize * 5)),
            capacity,
            opened_at: now,
        });
        tracing::debug!(capacity, "Recording clip opened");
        Ok(())
    }

    /// Append captured samples, truncating at the clip's capacity.
    pub fn append(&mut self, frame: &[f32]) -> CaptureStatus {
        let Some(clip) = self.open.as_mut() else {
            return CaptureStatus::Closed;
        };
        let room = clip.capacity.saturating_sub(clip.samples.len());
        let take = frame.len().min(room);
        clip.samples.extend_from_slice(&frame[..take]);
        if clip.samples.len() >= clip.capacity {
            CaptureStatus::Full
        } else {
            CaptureStatus::Open
        }
    }

    /// Seal the open clip, trimmed to its captured length.
    ///
    /// Fails with [`TurnError::EmptyCapture`] when nothing was captured (or no
    /// clip was open); the empty clip is discarded either way.
    pub fn seal(&mut self) -> Result<SealedClip, TurnError> {
        let clip = self.open.take().ok_or(TurnError::EmptyCapture)?;
        if clip.samples.is_empty() {
            tracing::debug!("Recording clip sealed empty");
            return Err(TurnError::EmptyCapture);
        }
        let mut samples = clip.samples;
        samples.shrink_to_fit();
        tracing::debug!(samples = samples.len(), "Recording clip sealed");
        Ok(SealedClip::new(samples, self.sample_rate))
    }

    /// Drop the open clip without sealing it.
    pub fn discard(&mut self) -> bool {
        self.open.take().is_some()
    }

    pub const fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub const fn clip(&self) -> Option<&RecordingClip> {
        self.open.as_ref()
    }

    /// Whether the open clip has been open for the full duration cap.
    pub fn max_duration_reached(&self, now: Instant) -> bool {
        self.open
            .as_ref()
            .is_some_and(|clip| now.saturating_duration_since(clip.opened_at) >= self.max_duration)
    }

    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub const fn max_duration(&self) -> Duration {
        self.max_duration
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn capacity(&self) -> usize {
        (self.max_duration.as_secs_f64() * f64::from(self.sample_rate)).ceil() as usize
    }
}
