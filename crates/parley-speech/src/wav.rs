//! 16-bit PCM WAV codec.
//!
//! Recognition uploads are encoded as mono PCM16 with a plain 44-byte RIFF
//! header. Decoding accepts any integer or float WAV and mixes it down to
//! mono f32 in `[-1, 1]`.

use std::io::Cursor;
use std::path::Path;

use parley_core::{SealedClip, SynthesizedAudio};
use thiserror::Error;

/// Errors from the WAV codec.
#[derive(Debug, Error)]
pub enum WavError {
    /// hound rejected the data or the file.
    #[error("WAV error: {0}")]
    Hound(#[from] hound::Error),

    /// There were no samples to encode or decode.
    #[error("WAV data contains no samples")]
    Empty,

    /// The sample rate is zero.
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),
}

/// Decoded mono audio.
#[derive(Debug, Clone, PartialEq)]
pub struct WavAudio {
    /// Mono f32 samples in `[-1, 1]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl WavAudio {
    /// Resample to `sample_rate` by linear interpolation.
    #[must_use]
    pub fn resampled(self, sample_rate: u32) -> Self {
        if sample_rate == self.sample_rate || sample_rate == 0 {
            return self;
        }
        Self {
            samples: resample_linear(&self.samples, self.sample_rate, sample_rate),
            sample_rate,
        }
    }
}

impl From<WavAudio> for SynthesizedAudio {
    fn from(audio: WavAudio) -> Self {
        Self {
            samples: audio.samples,
            sample_rate: audio.sample_rate,
        }
    }
}

const fn pcm16_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}

/// Encode mono samples as a PCM16 WAV byte buffer.
pub fn encode_pcm16(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, WavError> {
    if sample_rate == 0 {
        return Err(WavError::InvalidSampleRate(sample_rate));
    }
    if samples.is_empty() {
        return Err(WavError::Empty);
    }

    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, pcm16_spec(sample_rate))?;
        for &sample in samples {
            writer.write_sample(to_i16(sample))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Encode a sealed clip for upload.
pub fn encode_clip(clip: &SealedClip) -> Result<Vec<u8>, WavError> {
    encode_pcm16(clip.samples(), clip.sample_rate())
}

/// Decode WAV bytes to mono f32.
pub fn decode(bytes: &[u8]) -> Result<WavAudio, WavError> {
    read(hound::WavReader::new(Cursor::new(bytes))?)
}

/// Read a WAV file to mono f32.
pub fn read_file(path: impl AsRef<Path>) -> Result<WavAudio, WavError> {
    read(hound::WavReader::open(path)?)
}

/// Write mono samples to a PCM16 WAV file.
pub fn write_file(
    path: impl AsRef<Path>,
    samples: &[f32],
    sample_rate: u32,
) -> Result<(), WavError> {
    if sample_rate == 0 {
        return Err(WavError::InvalidSampleRate(sample_rate));
    }
    let mut writer = hound::WavWriter::create(path, pcm16_spec(sample_rate))?;
    for &sample in samples {
        writer.write_sample(to_i16(sample))?;
    }
    writer.finalize()?;
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn read<R: std::io::Read>(reader: hound::WavReader<R>) -> Result<WavAudio, WavError> {
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(WavError::InvalidSampleRate(0));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|s| s as f32 / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let channels = usize::from(spec.channels.max(1));
    let samples: Vec<f32> = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    if samples.is_empty() {
        return Err(WavError::Empty);
    }

    Ok(WavAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn resample_linear(samples: &[f32], from: u32, to: u32) -> Vec<f32> {
    if samples.is_empty() || from == 0 {
        return Vec::new();
    }
    let ratio = f64::from(from) / f64::from(to);
    let out_len = ((samples.len() as f64) / ratio).round() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let index = (pos.floor() as usize).min(last);
            let next = (index + 1).min(last);
            let frac = (pos - index as f64) as f32;
            samples[index] + (samples[next] - samples[index]) * frac
        })
        .collect()
}
