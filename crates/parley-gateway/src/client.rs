//! Interview service client.
//!
//! Inherent methods speak in [`GatewayError`]; the `DialogueGateway` port
//! impl in `port.rs` maps them onto the coordinator's error taxonomy.

use std::sync::{PoisonError, RwLock};

use parley_core::{
    ChatReply, SessionFeedback, SessionInfo, SessionMessage, SessionProfile, SessionStart,
};
use url::Url;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::ChatMessageRequest;
use crate::url::{
    build_chat_url, build_feedback_url, build_messages_url, build_session_url, build_start_url,
};

// ============================================================================
// Type Aliases
// ============================================================================

/// Default gateway client using the reqwest HTTP backend.
pub type DefaultGatewayClient = GatewayClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the remote interview service.
///
/// Generic over an HTTP backend so tests can use canned responses. Use
/// [`DefaultGatewayClient`] in production code.
///
/// The client remembers the id of the last session it started; calls made
/// with an empty session id fall back to it.
pub struct GatewayClient<B: HttpBackend> {
    backend: B,
    base_url: Url,
    current_session: RwLock<Option<String>>,
}

impl DefaultGatewayClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let base_url = Url::parse(config.base_url())?;
        let backend = ReqwestBackend::new(config)?;
        Ok(Self::from_parts(base_url, backend))
    }
}

impl<B: HttpBackend> GatewayClient<B> {
    fn from_parts(base_url: Url, backend: B) -> Self {
        Self {
            backend,
            base_url,
            current_session: RwLock::new(None),
        }
    }

    /// Create a new client with a custom backend.
    #[cfg(test)]
    pub(crate) fn with_backend(base_url: &str, backend: B) -> Self {
        Self::from_parts(Url::parse(base_url).unwrap(), backend)
    }

    #[cfg(test)]
    pub(crate) const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Id of the session most recently started through this client.
    pub fn current_session(&self) -> Option<String> {
        self.current_session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget the current session id.
    pub fn clear_session(&self) {
        *self
            .current_session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Resolve an explicit session id, or fall back to the current one.
    fn resolve_session(&self, session_id: &str) -> GatewayResult<String> {
        if !session_id.trim().is_empty() {
            return Ok(session_id.to_string());
        }
        self.current_session()
            .ok_or(GatewayError::NoActiveSession)
    }

    /// Open a new session and remember its id.
    pub async fn start(&self, profile: &SessionProfile) -> GatewayResult<SessionStart> {
        let url = build_start_url(&self.base_url)?;
        let start: SessionStart = self.backend.post_json(&url, profile).await?;
        if start.session_id.trim().is_empty() {
            return Err(GatewayError::InvalidResponse {
                message: "session start returned an empty session_id".to_string(),
            });
        }

        tracing::info!(session_id = %start.session_id, "Interview session started");
        *self
            .current_session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(start.session_id.clone());
        Ok(start)
    }

    /// Send one user message and wait for the reply.
    pub async fn chat(&self, session_id: &str, message: &str) -> GatewayResult<ChatReply> {
        let session_id = self.resolve_session(session_id)?;
        let url = build_chat_url(&self.base_url)?;
        let body = ChatMessageRequest {
            message,
            session_id: &session_id,
        };
        let reply: ChatReply = self.backend.post_json(&url, &body).await?;
        tracing::debug!(
            session_id = %session_id,
            session_ended = reply.session_ended,
            "Chat reply received"
        );
        if reply.session_ended {
            self.clear_session();
        }
        Ok(reply)
    }

    pub async fn info(&self, session_id: &str) -> GatewayResult<SessionInfo> {
        let session_id = self.resolve_session(session_id)?;
        let url = build_session_url(&self.base_url, &session_id)?;
        self.backend.get_json(&url).await
    }

    pub async fn messages(&self, session_id: &str) -> GatewayResult<Vec<SessionMessage>> {
        let session_id = self.resolve_session(session_id)?;
        let url = build_messages_url(&self.base_url, &session_id)?;
        self.backend.get_json(&url).await
    }

    pub async fn feedback(&self, session_id: &str) -> GatewayResult<SessionFeedback> {
        let session_id = self.resolve_session(session_id)?;
        let url = build_feedback_url(&self.base_url, &session_id)?;
        self.backend.get_json(&url).await
    }

    /// GET the base URL; any 2xx counts as reachable.
    pub async fn ping(&self) -> GatewayResult<()> {
        self.backend.probe(&self.base_url).await
    }
}

impl<B: HttpBackend> std::fmt::Debug for GatewayClient<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url.as_str())
            .field("current_session", &self.current_session())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use serde_json::json;
    use tokio_test::assert_ok;

    const BASE: &str = "http://localhost:8000";

    fn started_backend() -> FakeBackend {
        FakeBackend::new().with_json(
            "/api/sessions/start",
            json!({"session_id": "abc", "welcome_message": "Welcome!", "status": "active"}),
        )
    }

    #[test]
    fn test_default_client_creation() {
        let client = DefaultGatewayClient::new(&GatewayConfig::new()).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
        assert_eq!(client.current_session(), None);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = GatewayConfig::new().with_base_url("not a url");
        assert!(matches!(
            DefaultGatewayClient::new(&config),
            Err(GatewayError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_start_remembers_session() {
        let client = GatewayClient::with_backend(BASE, started_backend());

        let start = assert_ok!(client.start(&SessionProfile::default()).await);
        assert_eq!(start.welcome_message, "Welcome!");
        assert_eq!(client.current_session().as_deref(), Some("abc"));

        let sent = &client.backend().requests()[0];
        assert_eq!(sent.body.as_ref().unwrap()["candidate_name"], "John Doe");
        assert_eq!(sent.body.as_ref().unwrap()["interview_type"], "general");
    }

    #[tokio::test]
    async fn test_start_without_session_id_is_invalid() {
        let backend = FakeBackend::new().with_json("/api/sessions/start", json!({"session_id": ""}));
        let client = GatewayClient::with_backend(BASE, backend);

        let result = client.start(&SessionProfile::default()).await;
        assert!(matches!(result, Err(GatewayError::InvalidResponse { .. })));
        assert_eq!(client.current_session(), None);
    }

    #[tokio::test]
    async fn test_chat_falls_back_to_current_session() {
        let backend = started_backend()
            .with_json("/api/chat/send", json!({"response": "Tell me more"}));
        let client = GatewayClient::with_backend(BASE, backend);
        assert_ok!(client.start(&SessionProfile::default()).await);

        let reply = assert_ok!(client.chat("", "Hello").await);
        assert_eq!(reply.response, "Tell me more");

        let sent = &client.backend().requests()[1];
        assert_eq!(
            sent.body,
            Some(json!({"message": "Hello", "session_id": "abc"}))
        );
    }

    #[tokio::test]
    async fn test_chat_without_session_fails() {
        let client = GatewayClient::with_backend(BASE, FakeBackend::new());
        let result = client.chat("  ", "Hello").await;
        assert!(matches!(result, Err(GatewayError::NoActiveSession)));
        assert!(client.backend().requests().is_empty());
    }

    #[tokio::test]
    async fn test_ended_session_is_forgotten() {
        let backend = started_backend().with_json(
            "/api/chat/send",
            json!({"response": "Goodbye", "session_ended": true, "feedback": "Well done"}),
        );
        let client = GatewayClient::with_backend(BASE, backend);
        client.start(&SessionProfile::default()).await.unwrap();

        let reply = client.chat("abc", "Thanks").await.unwrap();
        assert_eq!(reply.summary(), Some("Well done"));
        assert_eq!(client.current_session(), None);
    }

    #[tokio::test]
    async fn test_read_back_endpoints() {
        let backend = FakeBackend::new()
            .with_json(
                "/api/sessions/abc/messages",
                json!([
                    {"sender": "user", "message": "Hello"},
                    {"sender": "agent", "message": "Hi there", "timestamp": "2024-01-01T10:00:00"}
                ]),
            )
            .with_json(
                "/api/sessions/abc/feedback",
                json!({"overall_score": "8/10", "strengths": "Clear", "improvements": "Depth"}),
            )
            .with_json(
                "/api/sessions/abc",
                json!({"session_id": "abc", "status": "completed", "message_count": 4}),
            );
        let client = GatewayClient::with_backend(BASE, backend);

        let info = client.info("abc").await.unwrap();
        assert_eq!(info.status, "completed");
        assert_eq!(info.message_count, 4);

        let messages = client.messages("abc").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].sender, "agent");

        let feedback = client.feedback("abc").await.unwrap();
        assert_eq!(feedback.overall_score, "8/10");
        assert_eq!(feedback.detailed_feedback, "");
    }

    #[tokio::test]
    async fn test_ping_reports_server_errors() {
        let backend =
            FakeBackend::new().with_response("/", CannedResponse::Status(502, "bad gateway".into()));
        let client = GatewayClient::with_backend(BASE, backend);

        let result = client.ping().await;
        assert!(matches!(
            result,
            Err(GatewayError::ApiRequestFailed { status: 502, .. })
        ));
    }
}
