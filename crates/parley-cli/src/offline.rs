//! Offline stand-ins for the speech services.
//!
//! Used when no Azure credentials are configured: every sealed clip is
//! "recognized" as the next scripted transcript, and replies are spoken as
//! silence lasting the estimated speech length.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use parley_core::{
    RecognitionClient, RecognitionOutcome, SealedClip, SynthesisClient, SynthesizedAudio,
    TurnError, VoiceName,
};
use parley_voice::estimate::speech_duration;

/// Recognizer that returns scripted transcripts in order.
///
/// Once the script runs out every clip is a no-match.
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    transcripts: Mutex<VecDeque<String>>,
}

impl ScriptedRecognizer {
    pub fn new(transcripts: impl IntoIterator<Item = String>) -> Self {
        Self {
            transcripts: Mutex::new(transcripts.into_iter().collect()),
        }
    }

    /// Transcripts not yet handed out.
    pub fn remaining(&self) -> usize {
        self.transcripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl RecognitionClient for ScriptedRecognizer {
    async fn recognize(&self, clip: &SealedClip) -> Result<RecognitionOutcome, TurnError> {
        let next = self
            .transcripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        tracing::debug!(samples = clip.len(), scripted = next.is_some(), "Offline recognition");
        Ok(next.map_or(RecognitionOutcome::NoMatch, RecognitionOutcome::Recognized))
    }
}

/// Synthesizer producing silence as long as the text would take to say.
#[derive(Debug, Clone, Copy)]
pub struct SilentSynthesizer {
    sample_rate: u32,
}

impl SilentSynthesizer {
    pub const fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

#[async_trait]
impl SynthesisClient for SilentSynthesizer {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    async fn synthesize(
        &self,
        text: &str,
        _voice: VoiceName,
    ) -> Result<SynthesizedAudio, TurnError> {
        let length = speech_duration(text, Duration::ZERO, Duration::ZERO);
        let samples = (length.as_secs_f64() * f64::from(self.sample_rate)).round() as usize;
        Ok(SynthesizedAudio {
            samples: vec![0.0; samples],
            sample_rate: self.sample_rate,
        })
    }
}
