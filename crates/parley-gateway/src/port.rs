//! `DialogueGateway` implementation for `GatewayClient`.
//!
//! Every gateway failure reaches the coordinator as
//! [`TurnError::TransportFailure`]; the HTTP status survives when the
//! server answered.

use async_trait::async_trait;
use parley_core::{
    ChatReply, DialogueGateway, SessionFeedback, SessionInfo, SessionMessage, SessionProfile,
    SessionStart, TurnError,
};

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `GatewayError` to the coordinator's `TurnError`.
fn map_error(err: GatewayError) -> TurnError {
    let code = match &err {
        GatewayError::ApiRequestFailed { status, .. } => Some(*status),
        GatewayError::Network(e) => e.status().map(|s| s.as_u16()),
        _ => None,
    };
    let message = match err {
        GatewayError::ApiRequestFailed { status, body, .. } if body.trim().is_empty() => {
            format!("HTTP {status}")
        }
        GatewayError::ApiRequestFailed { body, .. } => body,
        other => other.to_string(),
    };
    tracing::warn!(code = ?code, %message, "Dialogue gateway request failed");
    TurnError::TransportFailure { code, message }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend> DialogueGateway for GatewayClient<B> {
    async fn start_session(&self, profile: &SessionProfile) -> Result<SessionStart, TurnError> {
        self.start(profile).await.map_err(map_error)
    }

    async fn send_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<ChatReply, TurnError> {
        self.chat(session_id, message).await.map_err(map_error)
    }

    async fn session_info(&self, session_id: &str) -> Result<SessionInfo, TurnError> {
        self.info(session_id).await.map_err(map_error)
    }

    async fn session_messages(&self, session_id: &str) -> Result<Vec<SessionMessage>, TurnError> {
        self.messages(session_id).await.map_err(map_error)
    }

    async fn session_feedback(&self, session_id: &str) -> Result<SessionFeedback, TurnError> {
        self.feedback(session_id).await.map_err(map_error)
    }

    async fn test_connection(&self) -> Result<(), TurnError> {
        self.ping().await.map_err(map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    const BASE: &str = "http://localhost:8000";

    #[test]
    fn test_map_error_keeps_status_and_body() {
        let err = map_error(GatewayError::ApiRequestFailed {
            status: 500,
            url: "http://localhost:8000/api/chat/send".to_string(),
            body: r#"{"detail":"model overloaded"}"#.to_string(),
        });
        assert_eq!(
            err,
            TurnError::TransportFailure {
                code: Some(500),
                message: r#"{"detail":"model overloaded"}"#.to_string(),
            }
        );
    }

    #[test]
    fn test_map_error_blank_body() {
        let err = map_error(GatewayError::ApiRequestFailed {
            status: 404,
            url: String::new(),
            body: "  ".to_string(),
        });
        assert_eq!(
            err,
            TurnError::TransportFailure {
                code: Some(404),
                message: "HTTP 404".to_string(),
            }
        );
    }

    #[test]
    fn test_map_error_without_status() {
        let err = map_error(GatewayError::NoActiveSession);
        assert!(matches!(
            err,
            TurnError::TransportFailure { code: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_port_send_message_failure() {
        let backend = FakeBackend::new().with_response(
            "/api/chat/send",
            CannedResponse::Status(503, "try later".to_string()),
        );
        let gateway: &dyn DialogueGateway = &GatewayClient::with_backend(BASE, backend);

        let err = assert_err!(gateway.send_message("abc", "Hello").await);
        assert!(err.is_transport());
        assert_eq!(
            err,
            TurnError::TransportFailure {
                code: Some(503),
                message: "try later".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_port_round_trip() {
        let backend = FakeBackend::new()
            .with_json("/api/sessions/start", json!({"session_id": "s1"}))
            .with_json("/api/chat/send", json!({"response": "Why this role?"}));
        let client = GatewayClient::with_backend(BASE, backend);
        let gateway: &dyn DialogueGateway = &client;

        let start = assert_ok!(gateway.start_session(&SessionProfile::default()).await);
        assert_eq!(start.session_id, "s1");

        let reply = assert_ok!(gateway.send_message(&start.session_id, "Hi").await);
        assert_eq!(reply.response, "Why this role?");
        assert!(!reply.session_ended);
    }

    #[tokio::test]
    async fn test_port_connection_check() {
        let client = GatewayClient::with_backend(BASE, FakeBackend::new().with_json("/", json!({})));
        assert_ok!(client.test_connection().await);
    }
}
