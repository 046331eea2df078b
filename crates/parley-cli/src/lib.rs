#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

// Used by main.rs only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod offline;
pub mod parser;
pub mod presentation;
pub mod sink;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, SpeechArgs, bootstrap, default_settings_path, load_settings};
pub use commands::{Commands, ProfileArgs, SessionCommand, SettingsCommand};
pub use error::CliError;
pub use parser::Cli;
