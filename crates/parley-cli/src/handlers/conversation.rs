//! Pieces shared by the `converse` and `chat` handlers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parley_voice::{AudioSink, CoordinatorEvent, NullSink, TurnCoordinator};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::error::CliError;
use crate::presentation::{format_event, format_metrics};
use crate::sink::WavDirSink;

/// Driver ticks per second; audio frames hold one tick of samples.
pub const TICKS_PER_SECOND: u32 = 20;

pub fn tick_interval() -> Duration {
    Duration::from_secs(1) / TICKS_PER_SECOND
}

/// Samples per audio frame at `sample_rate`.
pub const fn frame_len(sample_rate: u32) -> usize {
    (sample_rate / TICKS_PER_SECOND) as usize
}

/// Reply sink: numbered WAV files, or nothing.
pub fn reply_sink(output_dir: Option<PathBuf>) -> Result<Arc<dyn AudioSink>, CliError> {
    let sink: Arc<dyn AudioSink> = match output_dir {
        Some(dir) => Arc::new(WavDirSink::new(dir)?),
        None => Arc::new(NullSink),
    };
    Ok(sink)
}

/// Print coordinator events until the coordinator is dropped.
pub fn spawn_printer(
    mut events: UnboundedReceiver<CoordinatorEvent>,
    show_timestamps: bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Some(line) = format_event(&event, show_timestamps) {
                println!("{line}");
            }
        }
    })
}

/// Final report once the driver has stopped.
pub fn print_report(coordinator: &TurnCoordinator) {
    println!();
    println!("Conversation finished ({} log lines)", coordinator.log().len());
    println!("{}", format_metrics(coordinator.metrics()));
    if !coordinator.archive().is_empty() {
        println!("  {:<22}{}", "clips archived", coordinator.archive().len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_matches_tick() {
        assert_eq!(tick_interval(), Duration::from_millis(50));
        assert_eq!(frame_len(16_000), 800);
        assert_eq!(frame_len(48_000), 2_400);
    }

    #[test]
    fn test_reply_sink_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        reply_sink(Some(target.clone())).unwrap();
        assert!(target.is_dir());
    }
}
