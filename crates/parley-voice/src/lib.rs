#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod archive;
pub mod audio_io;
pub mod buffer;
pub mod config;
pub mod coordinator;
pub mod driver;
pub mod estimate;
pub mod inbox;
pub mod metrics;
pub mod microphone;
pub mod pause;
pub mod recording;
pub mod timer;
pub mod vad;

// Re-export key types for convenience
pub use audio_io::{AudioSink, AudioSource, BufferedSource, NullSink};
pub use config::TurnConfig;
pub use coordinator::{CoordinatorEvent, Effect, RequestId, TurnCoordinator, TurnState};
pub use driver::{ConversationDriver, DriverCommand, DriverHandle, DriverPorts};
pub use inbox::{Completion, InboxSender};
pub use metrics::TurnCoordinatorMetrics;
pub use microphone::MicrophoneMode;
pub use vad::{VadConfig, VadDecision, VoiceActivityDetector};

// Silence unused dev-dependency warnings; these are used by the integration tests
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
