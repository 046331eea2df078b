//! Conversation log: a bounded, ordered list of dialogue turns.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Who produced a dialogue turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
    System,
}

impl Role {
    /// Label shown in front of rendered turns.
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Agent => "AI Interviewer",
            Self::System => "System",
        }
    }
}

/// One entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl DialogueTurn {
    /// Create a turn stamped with the current local time.
    pub fn now(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    /// Render as `[HH:MM:SS] Label: text`, or `Label: text` without timestamps.
    pub fn render(&self, show_timestamps: bool) -> String {
        if show_timestamps {
            format!(
                "[{}] {}: {}",
                self.timestamp.format("%H:%M:%S"),
                self.role.label(),
                self.text
            )
        } else {
            format!("{}: {}", self.role.label(), self.text)
        }
    }
}

/// Bounded conversation log. The oldest turn is evicted once full.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    turns: VecDeque<DialogueTurn>,
    capacity: usize,
}

impl ConversationLog {
    /// Create an empty log holding at most `capacity` turns (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a turn, evicting the oldest one when at capacity.
    ///
    /// Returns the evicted turn, if any.
    pub fn push(&mut self, turn: DialogueTurn) -> Option<DialogueTurn> {
        let evicted = if self.turns.len() == self.capacity {
            self.turns.pop_front()
        } else {
            None
        };
        self.turns.push_back(turn);
        evicted
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &DialogueTurn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&DialogueTurn> {
        self.turns.back()
    }

    /// Render every turn, one per line.
    pub fn render(&self, show_timestamps: bool) -> String {
        self.turns
            .iter()
            .map(|turn| turn.render(show_timestamps))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut log = ConversationLog::new(2);
        log.push(DialogueTurn::now(Role::User, "one"));
        log.push(DialogueTurn::now(Role::Agent, "two"));
        let evicted = log.push(DialogueTurn::now(Role::User, "three"));

        assert_eq!(evicted.map(|t| t.text), Some("one".to_string()));
        let texts: Vec<_> = log.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "three"]);
    }

    #[test]
    fn render_without_timestamps_uses_labels() {
        let mut log = ConversationLog::new(10);
        log.push(DialogueTurn::now(Role::User, "Hello"));
        log.push(DialogueTurn::now(Role::Agent, "Welcome"));
        log.push(DialogueTurn::now(Role::System, "Interview session ended"));

        assert_eq!(
            log.render(false),
            "You: Hello\nAI Interviewer: Welcome\nSystem: Interview session ended"
        );
    }

    #[test]
    fn render_with_timestamps_prefixes_clock() {
        let turn = DialogueTurn::now(Role::User, "Hi");
        let rendered = turn.render(true);
        assert!(rendered.starts_with('['));
        assert!(rendered.ends_with("] You: Hi"));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let log = ConversationLog::new(0);
        assert_eq!(log.capacity(), 1);
    }
}
