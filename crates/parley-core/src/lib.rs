#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod audio;
pub mod conversation;
pub mod dialogue;
pub mod error;
pub mod phase;
pub mod ports;
pub mod settings;
pub mod voice;

// Re-export commonly used types for convenience
pub use audio::{SealedClip, SynthesizedAudio};
pub use conversation::{ConversationLog, DialogueTurn, Role};
pub use dialogue::{
    ChatReply, DifficultyLevel, InterviewType, SessionFeedback, SessionInfo, SessionMessage,
    SessionProfile, SessionStart,
};
pub use error::TurnError;
pub use phase::TurnPhase;
pub use ports::{DialogueGateway, RecognitionClient, RecognitionOutcome, SynthesisClient};
pub use settings::{Settings, SettingsError, SettingsUpdate, validate_settings};
pub use voice::VoiceName;
