//! Speech-to-text port.

use async_trait::async_trait;

use crate::audio::SealedClip;
use crate::error::TurnError;

/// What the recognizer made of a clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    /// Speech was recognized.
    Recognized(String),

    /// Audio was processed but no speech matched.
    NoMatch,

    /// The recognizer canceled the request.
    Canceled {
        /// Short reason code, e.g. `Error` or `EndOfStream`.
        reason: String,
        /// Optional detail text from the service.
        details: Option<String>,
    },
}

impl RecognitionOutcome {
    /// Recognized text, if any non-blank text came back.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Recognized(text) => Some(text.trim()).filter(|t| !t.is_empty()),
            Self::NoMatch | Self::Canceled { .. } => None,
        }
    }
}

/// Port trait for speech recognition.
///
/// Implementations are called from a spawned task, never from the tick loop,
/// so they may block on network I/O freely.
#[async_trait]
pub trait RecognitionClient: Send + Sync {
    /// Recognize a sealed clip.
    ///
    /// Transport problems are errors; "heard nothing" is an `Ok` outcome.
    async fn recognize(&self, clip: &SealedClip) -> Result<RecognitionOutcome, TurnError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_recognition_has_no_text() {
        assert_eq!(RecognitionOutcome::Recognized("  ".into()).text(), None);
        assert_eq!(
            RecognitionOutcome::Recognized(" Hello ".into()).text(),
            Some("Hello")
        );
        assert_eq!(RecognitionOutcome::NoMatch.text(), None);
    }
}
