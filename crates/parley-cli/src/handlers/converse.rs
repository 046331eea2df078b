//! Converse command handler: a spoken interview from WAV files.

use std::path::PathBuf;

use anyhow::Result;
use parley_core::SessionProfile;
use parley_speech::wav::{self, WavAudio};
use parley_voice::{BufferedSource, ConversationDriver, TurnConfig};

use crate::bootstrap::{CliContext, SpeechArgs};
use crate::error::CliError;
use crate::handlers::conversation::{
    frame_len, print_report, reply_sink, spawn_printer, tick_interval,
};

/// Silence appended after each clip on top of the VAD silence window.
const TRAILING_MARGIN_SECS: f32 = 0.5;

/// Arguments for the converse command.
pub struct ConverseArgs {
    pub inputs: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub transcripts: Vec<String>,
    pub profile: SessionProfile,
    pub speech: SpeechArgs,
}

/// Execute the converse command.
pub async fn execute(ctx: &CliContext, args: ConverseArgs) -> Result<()> {
    let config = file_input_config(ctx.turn_config());

    let clips = args
        .inputs
        .iter()
        .map(|path| {
            wav::read_file(path).map_err(|e| CliError::Audio(format!("{}: {e}", path.display())))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let samples = build_input(clips, &config);
    tracing::info!(
        clips = args.inputs.len(),
        samples = samples.len(),
        sample_rate = config.sample_rate,
        "Prepared spoken input"
    );

    let source = BufferedSource::with_samples(frame_len(config.sample_rate), samples);
    let sink = reply_sink(args.output_dir)?;
    let ports = ctx.driver_ports(&args.speech, args.transcripts)?;
    let show_timestamps = ctx.settings.effective_show_timestamps();

    let (driver, handle, events) = ConversationDriver::new(config, ports, Box::new(source), sink);
    // Nothing sends commands during a file-driven run
    drop(handle);
    let driver = driver.with_tick_interval(tick_interval());
    let printer = spawn_printer(events, show_timestamps);

    let coordinator = driver.run(&args.profile).await.map_err(CliError::from)?;
    print_report(&coordinator);
    drop(coordinator);
    printer.await?;
    Ok(())
}

/// File input has no one to re-arm the microphone, so conversation mode
/// is always on.
pub fn file_input_config(mut config: TurnConfig) -> TurnConfig {
    if !config.continuous_listening {
        tracing::info!("Conversation mode forced on for file input");
        config.continuous_listening = true;
    }
    config
}

/// Concatenate clips at the capture rate, each followed by enough silence
/// for the VAD to end the utterance.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn build_input(clips: Vec<WavAudio>, config: &TurnConfig) -> Vec<f32> {
    let gap_secs = config.vad.silence_duration.as_secs_f32() + TRAILING_MARGIN_SECS;
    let gap = (gap_secs * config.sample_rate as f32).round() as usize;

    let mut samples = Vec::new();
    for clip in clips {
        samples.extend(clip.resampled(config.sample_rate).samples);
        samples.extend(std::iter::repeat_n(0.0, gap));
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_input_forces_conversation_mode() {
        let config = TurnConfig {
            continuous_listening: false,
            ..TurnConfig::default()
        };
        assert!(file_input_config(config).continuous_listening);
    }

    #[test]
    fn test_clips_are_padded_with_silence() {
        let config = TurnConfig::default();
        let clips = vec![
            WavAudio {
                samples: vec![0.3; 1_600],
                sample_rate: 16_000,
            },
            WavAudio {
                samples: vec![0.3; 800],
                sample_rate: 8_000,
            },
        ];

        let input = build_input(clips, &config);

        // 2.0 s silence window + 0.5 s margin = 40_000 samples per gap
        assert_eq!(input.len(), 1_600 + 40_000 + 1_600 + 40_000);
        assert!(input[1_600..41_600].iter().all(|s| *s == 0.0));
    }
}
