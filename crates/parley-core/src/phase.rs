//! Turn coordinator phases.
//!
//! ```text
//!   Idle → Listening → Recording → AwaitingRecognition → AwaitingReply → Speaking ─┐
//!            ▲                                                 │                   │
//!            └─────────────────────────────────────────────────┼───────────────────┘
//!                                                              └→ Ending → Idle
//! ```
//!
//! Any phase may be forced back to `Idle`.

use serde::{Deserialize, Serialize};

/// Current phase of the turn coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// No active conversation.
    #[default]
    Idle,

    /// Conversation active, microphone armed, nothing recording.
    Listening,

    /// Speech detected, a recording clip is open.
    Recording,

    /// Sealed clip dispatched to the recognizer.
    AwaitingRecognition,

    /// Recognized text submitted to the dialogue gateway.
    AwaitingReply,

    /// Reply is being spoken, listening paused.
    Speaking,

    /// Terminal reply received; waiting for the final utterance to finish.
    Ending,
}

impl TurnPhase {
    /// Whether a conversation is running in this phase.
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Whether a recognized utterance may be submitted from this phase.
    pub const fn accepts_utterance(self) -> bool {
        matches!(
            self,
            Self::Listening | Self::Recording | Self::AwaitingRecognition
        )
    }

    /// Short lowercase label for status lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Recording => "recording",
            Self::AwaitingRecognition => "recognizing",
            Self::AwaitingReply => "waiting for reply",
            Self::Speaking => "speaking",
            Self::Ending => "ending",
        }
    }
}
