//! Counters kept by the turn coordinator for one conversation.

use serde::Serialize;

/// Per-conversation counters. Reset when a conversation starts; only the
/// coordinator writes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TurnCoordinatorMetrics {
    pub(crate) messages_submitted: u32,
    pub(crate) requests_sent: u32,
    pub(crate) responses_received: u32,
    pub(crate) recognition_events: u32,
    pub(crate) duplicates_dropped: u32,
    pub(crate) ignored_events: u32,
    pub(crate) recognition_failures: u32,
    pub(crate) transport_failures: u32,
    pub(crate) clips_recorded: u32,
    pub(crate) empty_captures: u32,
}

impl TurnCoordinatorMetrics {
    /// User messages that completed a round trip to the dialogue gateway.
    pub const fn messages_submitted(&self) -> u32 {
        self.messages_submitted
    }

    /// Dialogue gateway requests dispatched (including failed ones).
    pub const fn requests_sent(&self) -> u32 {
        self.requests_sent
    }

    pub const fn responses_received(&self) -> u32 {
        self.responses_received
    }

    /// Recognized-text events seen, kept or not.
    pub const fn recognition_events(&self) -> u32 {
        self.recognition_events
    }

    /// Events dropped as a repeat of the last submitted text.
    pub const fn duplicates_dropped(&self) -> u32 {
        self.duplicates_dropped
    }

    /// Events dropped because the coordinator was busy or paused.
    pub const fn ignored_events(&self) -> u32 {
        self.ignored_events
    }

    /// No-match and canceled recognitions.
    pub const fn recognition_failures(&self) -> u32 {
        self.recognition_failures
    }

    pub const fn transport_failures(&self) -> u32 {
        self.transport_failures
    }

    pub const fn clips_recorded(&self) -> u32 {
        self.clips_recorded
    }

    pub const fn empty_captures(&self) -> u32 {
        self.empty_captures
    }
}
