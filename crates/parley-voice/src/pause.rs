//! Listening pause around speech synthesis.
//!
//! While the synthesized voice is playing the microphone must not be
//! sampled, or the recognizer transcribes the system itself. `speak` pauses
//! listening and schedules a resume after the estimated spoken length; the
//! coordinator decides at resume time whether capture is re-armed.

use std::time::{Duration, Instant};

use crate::timer::Timer;

/// Tracks whether listening is paused for synthesis and when it resumes.
#[derive(Debug, Default)]
pub struct ListeningPauseController {
    paused: bool,
    resume: Timer,
    utterance: u64,
}

impl ListeningPauseController {
    pub const fn new() -> Self {
        Self {
            paused: false,
            resume: Timer::new(),
            utterance: 0,
        }
    }

    /// Pause listening for `pause`, replacing any pending resume.
    ///
    /// Returns the utterance id the resume belongs to.
    pub fn speak(&mut self, now: Instant, pause: Duration) -> u64 {
        self.paused = true;
        self.utterance = self.resume.schedule(now, pause);
        tracing::debug!(
            utterance = self.utterance,
            pause_ms = pause.as_millis(),
            "Listening paused for synthesis"
        );
        self.utterance
    }

    /// Pause listening with no scheduled resume (final utterance).
    pub fn hold(&mut self) -> u64 {
        self.paused = true;
        self.resume.cancel();
        self.utterance = self.resume.generation();
        tracing::debug!(utterance = self.utterance, "Listening held for final utterance");
        self.utterance
    }

    /// The scheduled resume is due. The pause itself stays set until
    /// [`resume`](Self::resume) is called.
    pub fn poll(&mut self, now: Instant) -> Option<u64> {
        self.resume.poll(now)
    }

    /// Clear the pause. Returns `false` when listening was not paused.
    pub fn resume(&mut self) -> bool {
        self.resume.cancel();
        let was_paused = self.paused;
        self.paused = false;
        if was_paused {
            tracing::debug!(utterance = self.utterance, "Listening resumed");
        }
        was_paused
    }

    /// Drop any pending resume and clear the pause (forced end, teardown).
    pub fn release(&mut self) {
        self.resume.cancel();
        if self.paused {
            tracing::debug!(utterance = self.utterance, "Listening pause released");
        }
        self.paused = false;
    }

    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    pub const fn is_resume_pending(&self) -> bool {
        self.resume.is_pending()
    }

    /// Id of the most recent `speak`/`hold`.
    pub const fn utterance(&self) -> u64 {
        self.utterance
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.resume.remaining(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speak_pauses_until_resume_is_due() {
        let t0 = Instant::now();
        let mut pause = ListeningPauseController::new();
        let id = pause.speak(t0, Duration::from_secs(3));

        assert!(pause.is_paused());
        assert_eq!(pause.poll(t0 + Duration::from_secs(2)), None);
        assert_eq!(pause.poll(t0 + Duration::from_secs(3)), Some(id));
        assert!(pause.is_paused());

        assert!(pause.resume());
        assert!(!pause.is_paused());
        assert!(!pause.resume());
    }

    #[test]
    fn release_cancels_the_pending_resume() {
        let t0 = Instant::now();
        let mut pause = ListeningPauseController::new();
        pause.speak(t0, Duration::from_secs(1));
        pause.release();

        assert!(!pause.is_paused());
        assert_eq!(pause.poll(t0 + Duration::from_secs(10)), None);
    }

    #[test]
    fn hold_has_no_resume() {
        let t0 = Instant::now();
        let mut pause = ListeningPauseController::new();
        pause.speak(t0, Duration::from_secs(1));
        let held = pause.hold();

        assert!(pause.is_paused());
        assert!(!pause.is_resume_pending());
        assert_eq!(pause.poll(t0 + Duration::from_secs(10)), None);
        assert_eq!(pause.utterance(), held);
    }

    #[test]
    fn a_new_speak_replaces_the_old_resume() {
        let t0 = Instant::now();
        let mut pause = ListeningPauseController::new();
        let first = pause.speak(t0, Duration::from_secs(1));
        let second = pause.speak(t0 + Duration::from_millis(500), Duration::from_secs(2));

        assert_ne!(first, second);
        assert_eq!(pause.poll(t0 + Duration::from_secs(1)), None);
        assert_eq!(pause.poll(t0 + Duration::from_millis(2500)), Some(second));
    }
}
