//! Dialogue gateway data shapes.
//!
//! These mirror the remote interview service's JSON contract. Field names
//! are the wire names.

use serde::{Deserialize, Serialize};

/// Kind of interview the remote service should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    #[default]
    General,
    Technical,
    Behavioral,
    CaseStudy,
}

/// Question difficulty requested from the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

/// Who the interview is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProfile {
    pub candidate_name: String,
    pub position: String,
    #[serde(default)]
    pub interview_type: InterviewType,
    #[serde(default)]
    pub difficulty_level: DifficultyLevel,
}

impl Default for SessionProfile {
    fn default() -> Self {
        Self {
            candidate_name: "John Doe".to_string(),
            position: "Software Developer".to_string(),
            interview_type: InterviewType::default(),
            difficulty_level: DifficultyLevel::default(),
        }
    }
}

/// Reply to a session start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStart {
    pub session_id: String,
    #[serde(default)]
    pub welcome_message: String,
    #[serde(default)]
    pub status: String,
}

/// Reply to a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub session_ended: bool,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl ChatReply {
    /// Feedback text, treating a blank string the same as absent.
    pub fn summary(&self) -> Option<&str> {
        self.feedback
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}

/// Read-back of a session's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub message_count: u32,
}

/// One message in a session's server-side transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub sender: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Final evaluation for a session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionFeedback {
    #[serde(default)]
    pub overall_score: String,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub improvements: String,
    #[serde(default)]
    pub detailed_feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_defaults_match_service_expectations() {
        let profile = SessionProfile::default();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["candidate_name"], "John Doe");
        assert_eq!(json["position"], "Software Developer");
        assert_eq!(json["interview_type"], "general");
        assert_eq!(json["difficulty_level"], "medium");
    }

    #[test]
    fn case_study_uses_snake_case() {
        let json = serde_json::to_string(&InterviewType::CaseStudy).unwrap();
        assert_eq!(json, "\"case_study\"");
    }

    #[test]
    fn chat_reply_tolerates_missing_fields() {
        let reply: ChatReply = serde_json::from_str(r#"{"response":"Next question"}"#).unwrap();
        assert_eq!(reply.response, "Next question");
        assert!(!reply.session_ended);
        assert_eq!(reply.summary(), None);
    }

    #[test]
    fn blank_feedback_is_not_a_summary() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"response":"Bye","session_ended":true,"feedback":"   "}"#,
        )
        .unwrap();
        assert_eq!(reply.summary(), None);

        let reply = ChatReply {
            feedback: Some("Good job".to_string()),
            ..ChatReply::default()
        };
        assert_eq!(reply.summary(), Some("Good job"));
    }
}
