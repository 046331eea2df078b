//! Commands enum and subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use parley_core::{DifficultyLevel, InterviewType, SessionProfile};

use crate::bootstrap::SpeechArgs;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run a spoken interview from WAV files of user speech
    Converse {
        /// WAV files, one utterance each, played in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory for synthesized replies (reply-001.wav, ...)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Offline recognizer output, one per clip, in order
        #[arg(long = "transcript")]
        transcripts: Vec<String>,
        #[command(flatten)]
        profile: ProfileArgs,
        #[command(flatten)]
        speech: SpeechArgs,
    },

    /// Run a typed interview, one message per stdin line
    Chat {
        /// Directory for synthesized replies (reply-001.wav, ...)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        #[command(flatten)]
        profile: ProfileArgs,
        #[command(flatten)]
        speech: SpeechArgs,
    },

    /// Talk to the interview service directly
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Check that the interview service answers
    Ping,

    /// Inspect the settings file
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

/// Interview service subcommands.
#[derive(Subcommand)]
pub enum SessionCommand {
    /// Open a new session and print its id and welcome message
    Start {
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Send one message to a session
    Send {
        session_id: String,
        message: String,
    },
    /// Show a session's state
    Info { session_id: String },
    /// Show a session's transcript
    Messages { session_id: String },
    /// Show a session's final evaluation
    Feedback { session_id: String },
}

/// Settings subcommands.
#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show effective settings
    Show,
    /// Validate the settings file
    Validate,
    /// Print the settings file location
    Path,
}

/// Who the interview is for.
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Candidate name
    #[arg(long, default_value = "John Doe")]
    pub candidate: String,
    /// Position being interviewed for
    #[arg(long, default_value = "Software Developer")]
    pub position: String,
    /// general, technical, behavioral or case_study
    #[arg(long, default_value = "general", value_parser = parse_interview_type)]
    pub interview_type: InterviewType,
    /// easy, medium, hard or expert
    #[arg(long, default_value = "medium", value_parser = parse_difficulty)]
    pub difficulty: DifficultyLevel,
}

impl ProfileArgs {
    pub fn into_profile(self) -> SessionProfile {
        SessionProfile {
            candidate_name: self.candidate,
            position: self.position,
            interview_type: self.interview_type,
            difficulty_level: self.difficulty,
        }
    }
}

fn parse_interview_type(s: &str) -> Result<InterviewType, String> {
    match s {
        "general" => Ok(InterviewType::General),
        "technical" => Ok(InterviewType::Technical),
        "behavioral" => Ok(InterviewType::Behavioral),
        "case_study" | "case-study" => Ok(InterviewType::CaseStudy),
        other => Err(format!(
            "unknown interview type '{other}' (expected general, technical, behavioral or case_study)"
        )),
    }
}

fn parse_difficulty(s: &str) -> Result<DifficultyLevel, String> {
    match s {
        "easy" => Ok(DifficultyLevel::Easy),
        "medium" => Ok(DifficultyLevel::Medium),
        "hard" => Ok(DifficultyLevel::Hard),
        "expert" => Ok(DifficultyLevel::Expert),
        other => Err(format!(
            "unknown difficulty '{other}' (expected easy, medium, hard or expert)"
        )),
    }
}
