//! File-backed audio sink.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use parley_core::{SynthesizedAudio, TurnError};
use parley_voice::AudioSink;

use crate::error::CliError;

/// Writes every reply to `reply-NNN.wav` in a directory.
#[derive(Debug)]
pub struct WavDirSink {
    dir: PathBuf,
    written: AtomicUsize,
}

impl WavDirSink {
    /// Create the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CliError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: AtomicUsize::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Replies written so far.
    pub fn written(&self) -> usize {
        self.written.load(Ordering::SeqCst)
    }
}

impl AudioSink for WavDirSink {
    fn play(&self, audio: SynthesizedAudio) -> Result<(), TurnError> {
        let index = self.written.fetch_add(1, Ordering::SeqCst) + 1;
        let path = self.dir.join(format!("reply-{index:03}.wav"));
        parley_speech::wav::write_file(&path, &audio.samples, audio.sample_rate)
            .map_err(|e| TurnError::Audio(format!("{}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), secs = audio.duration().as_secs_f32(), "Reply written");
        Ok(())
    }

    fn stop(&self) -> Result<(), TurnError> {
        Ok(())
    }
}
