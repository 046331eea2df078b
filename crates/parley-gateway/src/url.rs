//! URL construction helpers for the interview service API.
//!
//! Every endpoint lives under `<base>/api/...`. Session ids are pushed as
//! path segments, so the `url` crate percent-encodes them.

use url::Url;

use crate::error::{GatewayError, GatewayResult};

/// Append path segments to `base`, keeping any path prefix it already has.
fn endpoint(base: &Url, segments: &[&str]) -> GatewayResult<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| GatewayError::CannotBeABase {
            url: base.to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `POST /api/sessions/start`
pub fn build_start_url(base: &Url) -> GatewayResult<Url> {
    endpoint(base, &["api", "sessions", "start"])
}

/// `POST /api/chat/send`
pub fn build_chat_url(base: &Url) -> GatewayResult<Url> {
    endpoint(base, &["api", "chat", "send"])
}

/// `GET /api/sessions/{id}`
pub fn build_session_url(base: &Url, session_id: &str) -> GatewayResult<Url> {
    endpoint(base, &["api", "sessions", session_id])
}

/// `GET /api/sessions/{id}/messages`
pub fn build_messages_url(base: &Url, session_id: &str) -> GatewayResult<Url> {
    endpoint(base, &["api", "sessions", session_id, "messages"])
}

/// `GET /api/sessions/{id}/feedback`
pub fn build_feedback_url(base: &Url, session_id: &str) -> GatewayResult<Url> {
    endpoint(base, &["api", "sessions", session_id, "feedback"])
}
