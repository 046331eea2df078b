#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod config;
mod error;
mod recognizer;
mod synthesizer;
mod transport;
pub mod wav;

// ============================================================================
// Public API
// ============================================================================

pub use config::{DEFAULT_LANGUAGE, SYNTHESIS_OUTPUT_FORMAT, SpeechConfig};
pub use error::{SpeechError, SpeechResult};
pub use recognizer::{AzureRecognizer, DefaultAzureRecognizer, parse_recognition_response};
pub use synthesizer::{AzureSynthesizer, DefaultAzureSynthesizer, build_ssml};
pub use transport::{ReqwestTransport, SpeechRequest, SpeechTransport};
pub use wav::{WavAudio, WavError};
