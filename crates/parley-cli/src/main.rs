//! CLI entry point - the composition root.
//!
//! Command dispatch routes to handlers; all adapters are wired in
//! `bootstrap`.

use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use parley_cli::handlers::{self, chat::ChatArgs, converse::ConverseArgs};
use parley_cli::{Cli, CliError, Commands, bootstrap};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(mut cli: Cli) -> Result<()> {
    let command = match cli.command.take() {
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
        // Settings commands work without a usable gateway configuration
        Some(Commands::Settings { command }) => {
            return handlers::settings::execute(cli.settings.as_deref(), command);
        }
        Some(command) => command,
    };

    let ctx = bootstrap(&cli)?;

    match command {
        Commands::Converse {
            inputs,
            output_dir,
            transcripts,
            profile,
            speech,
        } => {
            let args = ConverseArgs {
                inputs,
                output_dir,
                transcripts,
                profile: profile.into_profile(),
                speech,
            };
            handlers::converse::execute(&ctx, args).await?;
        }
        Commands::Chat {
            output_dir,
            profile,
            speech,
        } => {
            let args = ChatArgs {
                output_dir,
                profile: profile.into_profile(),
                speech,
            };
            handlers::chat::execute(&ctx, args).await?;
        }
        Commands::Session { command } => {
            handlers::session::execute(&ctx, command).await?;
        }
        Commands::Ping => {
            handlers::ping::execute(&ctx).await?;
        }
        Commands::Settings { command } => {
            handlers::settings::execute(cli.settings.as_deref(), command)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so clap's env fallbacks see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            let code = error
                .downcast_ref::<CliError>()
                .map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
