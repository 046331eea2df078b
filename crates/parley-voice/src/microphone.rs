//! Exclusive microphone lease.
//!
//! The device handle is held by at most one of: the continuous low-latency
//! monitor feeding the VAD, or the single open recording clip. Acquiring
//! one releases the other first.

use serde::Serialize;

/// Who currently holds the microphone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MicrophoneMode {
    /// Nobody; the device is closed.
    #[default]
    Released,

    /// Continuous capture feeding the VAD.
    Monitoring,

    /// Capture feeding the open recording clip.
    Recording,
}

/// Tracks the current holder of the microphone.
#[derive(Debug, Default)]
pub struct MicrophoneLease {
    mode: MicrophoneMode,
}

impl MicrophoneLease {
    pub const fn new() -> Self {
        Self {
            mode: MicrophoneMode::Released,
        }
    }

    pub const fn mode(&self) -> MicrophoneMode {
        self.mode
    }

    /// Hand the microphone to `mode`, releasing the current holder first.
    ///
    /// Returns the new mode when it changed, `None` when it was already held
    /// that way.
    pub fn acquire(&mut self, mode: MicrophoneMode) -> Option<MicrophoneMode> {
        if self.mode == mode {
            return None;
        }
        if self.mode != MicrophoneMode::Released && mode != MicrophoneMode::Released {
            tracing::debug!(holder = ?self.mode, "Microphone: releasing current holder");
        }
        tracing::debug!(old = ?self.mode, new = ?mode, "Microphone lease changed");
        self.mode = mode;
        Some(mode)
    }

    pub fn release(&mut self) -> Option<MicrophoneMode> {
        self.acquire(MicrophoneMode::Released)
    }

    /// Whether captured frames should reach the coordinator at all.
    pub const fn is_capturing(&self) -> bool {
        !matches!(self.mode, MicrophoneMode::Released)
    }
}
