//! Error types for the speech adapters.

use thiserror::Error;

use crate::wav::WavError;

/// Result type for speech operations.
pub type SpeechResult<T> = Result<T, SpeechError>;

/// Errors that can occur when talking to Azure Speech.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The service answered with a non-success status.
    #[error("Speech service returned {status}: {body}")]
    ServiceFailed {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The response could not be interpreted.
    #[error("Invalid speech service response: {message}")]
    InvalidResponse {
        /// Description of what was wrong
        message: String,
    },

    /// The region cannot be turned into a host name.
    #[error("Invalid speech region: '{region}'")]
    InvalidRegion {
        /// The configured region
        region: String,
    },

    /// No subscription key or region was configured.
    #[error("Speech service credentials are not configured")]
    MissingCredentials,

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Audio could not be encoded or decoded.
    #[error(transparent)]
    Wav(#[from] WavError),
}

impl SpeechError {
    /// HTTP status, if the service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServiceFailed { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
