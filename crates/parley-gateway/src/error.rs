//! Error types for dialogue gateway operations.
//!
//! These errors are mapped to [`parley_core::TurnError::TransportFailure`]
//! at the port boundary.

use thiserror::Error;

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors related to the dialogue gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The service answered with a non-2xx status.
    #[error("Gateway request failed with status {status}: {url}{}", body_suffix(.body))]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
        /// Raw response body, possibly empty
        body: String,
    },

    /// The service answered with something we could not use.
    #[error("Invalid response from gateway: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// A message was sent before any session was started.
    #[error("No active interview session")]
    NoActiveSession,

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be used for API paths: {url}")]
    CannotBeABase {
        /// The offending base URL
        url: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

fn body_suffix(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(" Response: {body}")
    }
}
