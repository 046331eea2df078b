//! Chat command handler: a typed interview over stdin.

use std::path::PathBuf;

use anyhow::Result;
use parley_core::SessionProfile;
use parley_voice::{BufferedSource, ConversationDriver, DriverCommand, DriverHandle};
use tokio::sync::mpsc;

use crate::bootstrap::{CliContext, SpeechArgs};
use crate::error::CliError;
use crate::handlers::conversation::{
    frame_len, print_report, reply_sink, spawn_printer, tick_interval,
};

/// Arguments for the chat command.
pub struct ChatArgs {
    pub output_dir: Option<PathBuf>,
    pub profile: SessionProfile,
    pub speech: SpeechArgs,
}

/// What one line of input asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum ChatInput {
    Command(DriverCommand),
    Blank,
    Unknown(String),
}

/// Interpret one stdin line.
pub fn parse_line(line: &str) -> ChatInput {
    let line = line.trim();
    match line {
        "" => ChatInput::Blank,
        "/end" | "/quit" => ChatInput::Command(DriverCommand::ForceEnd),
        "/resume" => ChatInput::Command(DriverCommand::ResumeListening),
        "/mode on" => ChatInput::Command(DriverCommand::SetConversationMode(true)),
        "/mode off" => ChatInput::Command(DriverCommand::SetConversationMode(false)),
        other if other.starts_with('/') => ChatInput::Unknown(other.to_string()),
        text => ChatInput::Command(DriverCommand::SendMessage(text.to_string())),
    }
}

/// Execute the chat command.
pub async fn execute(ctx: &CliContext, args: ChatArgs) -> Result<()> {
    let config = ctx.turn_config();
    let source = BufferedSource::new(frame_len(config.sample_rate));
    let sink = reply_sink(args.output_dir)?;
    let ports = ctx.driver_ports(&args.speech, Vec::new())?;
    let show_timestamps = ctx.settings.effective_show_timestamps();

    let (driver, handle, events) = ConversationDriver::new(config, ports, Box::new(source), sink);
    let driver = driver
        .with_tick_interval(tick_interval())
        .with_end_when_exhausted(false);
    let printer = spawn_printer(events, show_timestamps);

    let profile = args.profile;
    let mut task = tokio::spawn(async move { driver.run(&profile).await });

    println!("Type your answers. Commands: /resume, /mode on|off, /end");
    let mut lines = spawn_stdin_reader();
    let result = loop {
        tokio::select! {
            result = &mut task => break result?,
            line = lines.recv() => {
                let Some(line) = line else {
                    handle.force_end();
                    break task.await?;
                };
                dispatch(&handle, &line);
            }
        }
    };

    let coordinator = result.map_err(CliError::from)?;
    print_report(&coordinator);
    drop(coordinator);
    printer.await?;
    Ok(())
}

/// Read stdin on a plain thread so a pending read never holds up runtime
/// shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn dispatch(handle: &DriverHandle, line: &str) {
    match parse_line(line) {
        ChatInput::Command(command) => {
            if !handle.send(command) {
                tracing::debug!("Driver already stopped");
            }
        }
        ChatInput::Blank => {}
        ChatInput::Unknown(command) => {
            println!("  unknown command {command} (try /resume, /mode on|off, /end)");
        }
    }
}
