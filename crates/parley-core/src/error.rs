//! Recoverable error taxonomy shared by the coordinator and its collaborators.
//!
//! Nothing in here is fatal. Every variant leaves the turn coordinator in a
//! stable phase (`Listening`, or `Idle` when no conversation is active).

use crate::phase::TurnPhase;

/// Errors surfaced by the turn coordinator and the boundary ports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    /// A recording clip is already open.
    #[error("A recording is already in progress")]
    AlreadyRecording,

    /// A recording was sealed without any captured samples.
    #[error("Recording captured no audio")]
    EmptyCapture,

    /// Network or HTTP failure talking to a remote service.
    #[error("Transport failure{}: {message}", status_suffix(.code))]
    TransportFailure {
        /// HTTP status code, when the server answered at all.
        code: Option<u16>,
        /// Raw message or response body.
        message: String,
    },

    /// The recognizer heard audio but could not match any speech.
    #[error("No speech could be recognized")]
    RecognitionNoMatch,

    /// The recognizer gave up on the request.
    #[error("Recognition canceled: {reason}")]
    RecognitionCanceled {
        /// Reason reported by the recognizer.
        reason: String,
    },

    /// The synthesizer gave up on the request.
    #[error("Speech synthesis canceled: {reason}")]
    SynthesisCanceled {
        /// Reason reported by the synthesizer.
        reason: String,
    },

    /// The audio source or sink failed.
    #[error("Audio device error: {0}")]
    Audio(String),

    /// A command needs an active conversation.
    #[error("No conversation is active")]
    NotActive,

    /// A conversation is already running.
    #[error("A conversation is already active")]
    AlreadyActive,

    /// The command is not accepted in the current phase.
    #[error("Coordinator is busy ({phase:?})")]
    Busy {
        /// Phase the coordinator was in when the command arrived.
        phase: TurnPhase,
    },
}

impl TurnError {
    /// Shorthand for a transport failure without an HTTP status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportFailure {
            code: None,
            message: message.into(),
        }
    }

    /// Whether this error came from a remote call rather than local state.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::TransportFailure { .. })
    }
}

#[allow(clippy::ref_option)]
fn status_suffix(code: &Option<u16>) -> String {
    code.map(|c| format!(" (HTTP {c})")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failure_display_includes_status() {
        let err = TurnError::TransportFailure {
            code: Some(503),
            message: "service unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Transport failure (HTTP 503): service unavailable"
        );
    }

    #[test]
    fn transport_failure_display_without_status() {
        let err = TurnError::transport("connection refused");
        assert_eq!(err.to_string(), "Transport failure: connection refused");
        assert!(err.is_transport());
    }

    #[test]
    fn busy_names_the_phase() {
        let err = TurnError::Busy {
            phase: TurnPhase::AwaitingReply,
        };
        assert_eq!(err.to_string(), "Coordinator is busy (AwaitingReply)");
        assert!(!err.is_transport());
    }
}
