//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Voice turn-taking for interview bots.
#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Run and inspect voice interview conversations")]
#[command(version)]
pub struct Cli {
    /// Settings file (defaults to <config dir>/parley/settings.json)
    #[arg(long = "settings", global = true)]
    pub settings: Option<PathBuf>,

    /// Base URL of the interview service
    #[arg(
        long = "gateway-url",
        env = "PARLEY_GATEWAY_URL",
        default_value = parley_gateway::DEFAULT_BASE_URL,
        global = true
    )]
    pub gateway_url: String,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
