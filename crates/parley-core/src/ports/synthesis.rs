//! Text-to-speech port.

use async_trait::async_trait;

use crate::audio::SynthesizedAudio;
use crate::error::TurnError;
use crate::voice::VoiceName;

/// Port trait for speech synthesis.
///
/// The coordinator does not wait on playback completion; it estimates the
/// spoken length from the text instead.
#[async_trait]
pub trait SynthesisClient: Send + Sync {
    /// Synthesize `text` with `voice`.
    ///
    /// Failures are reported as [`TurnError::SynthesisCanceled`] or
    /// [`TurnError::TransportFailure`].
    async fn synthesize(&self, text: &str, voice: VoiceName)
    -> Result<SynthesizedAudio, TurnError>;
}
