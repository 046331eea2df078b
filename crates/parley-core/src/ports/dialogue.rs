//! Dialogue gateway port.

use async_trait::async_trait;

use crate::dialogue::{
    ChatReply, SessionFeedback, SessionInfo, SessionMessage, SessionProfile, SessionStart,
};
use crate::error::TurnError;

/// Port trait for the remote interview service.
///
/// Every failure is a [`TurnError::TransportFailure`] carrying the HTTP status
/// (when there was one) and the raw body or transport message.
#[async_trait]
pub trait DialogueGateway: Send + Sync {
    /// Open a new session.
    async fn start_session(&self, profile: &SessionProfile) -> Result<SessionStart, TurnError>;

    /// Send one user message and wait for the agent's reply.
    async fn send_message(&self, session_id: &str, message: &str)
    -> Result<ChatReply, TurnError>;

    /// Read back session state.
    async fn session_info(&self, session_id: &str) -> Result<SessionInfo, TurnError>;

    /// Read back the server-side transcript.
    async fn session_messages(&self, session_id: &str) -> Result<Vec<SessionMessage>, TurnError>;

    /// Read back the final evaluation.
    async fn session_feedback(&self, session_id: &str) -> Result<SessionFeedback, TurnError>;

    /// Check that the service answers at all.
    async fn test_connection(&self) -> Result<(), TurnError>;
}
