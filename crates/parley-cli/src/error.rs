//! CLI-specific error types and exit codes.

use parley_core::{SettingsError, TurnError};
use parley_speech::{SpeechError, WavError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument error the parser could not catch.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Settings file or environment is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The interview service or a speech service failed.
    #[error("Service error: {0}")]
    Service(String),

    /// Audio could not be read or written.
    #[error("Audio error: {0}")]
    Audio(String),
}

impl CliError {
    /// Map error to an exit code following sysexits.h.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 64, // EX_USAGE
            Self::Service(_) => 69,   // EX_UNAVAILABLE
            Self::Audio(_) => 65,     // EX_DATAERR
            Self::Io(_) => 74,        // EX_IOERR
            Self::Config(_) => 78,    // EX_CONFIG
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<TurnError> for CliError {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::Audio(message) => Self::Audio(message),
            other => Self::Service(other.to_string()),
        }
    }
}

impl From<SpeechError> for CliError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::MissingCredentials | SpeechError::InvalidRegion { .. } => {
                Self::Config(err.to_string())
            }
            SpeechError::Wav(e) => Self::Audio(e.to_string()),
            other => Self::Service(other.to_string()),
        }
    }
}

impl From<WavError> for CliError {
    fn from(err: WavError) -> Self {
        Self::Audio(err.to_string())
    }
}

impl From<parley_gateway::GatewayError> for CliError {
    fn from(err: parley_gateway::GatewayError) -> Self {
        Self::Config(err.to_string())
    }
}
