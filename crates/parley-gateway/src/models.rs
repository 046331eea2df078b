//! Request bodies sent to the interview service.
//!
//! Response shapes are the `parley-core` dialogue types; only the chat
//! request has no core counterpart.

use serde::Serialize;

/// Body of `POST /api/chat/send`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageRequest<'a> {
    pub message: &'a str,
    pub session_id: &'a str,
}
