//! Settings command handler.
//!
//! Runs before bootstrap so an invalid settings file can still be inspected.

use std::path::Path;

use anyhow::Result;

use crate::bootstrap::{default_settings_path, load_settings};
use crate::commands::SettingsCommand;
use crate::presentation::format_settings;

/// Execute a settings subcommand.
pub fn execute(path: Option<&Path>, command: SettingsCommand) -> Result<()> {
    let resolved = path.map(Path::to_path_buf).or_else(default_settings_path);
    match command {
        SettingsCommand::Path => match resolved {
            Some(path) => println!("{}", path.display()),
            None => println!("No configuration directory on this platform."),
        },
        SettingsCommand::Show => {
            let settings = load_settings(path)?;
            if let Some(path) = resolved.filter(|p| p.exists()) {
                println!("Settings from {}:", path.display());
            } else {
                println!("Default settings:");
            }
            println!("{}", format_settings(&settings));
        }
        SettingsCommand::Validate => {
            load_settings(path)?;
            println!("✓ Settings are valid.");
        }
    }
    Ok(())
}
