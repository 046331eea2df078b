//! Session command handler: direct calls to the interview service.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::commands::SessionCommand;
use crate::error::CliError;
use crate::presentation::{format_feedback, format_session_info};

/// Execute a session subcommand.
pub async fn execute(ctx: &CliContext, command: SessionCommand) -> Result<()> {
    let gateway = ctx.dialogue();
    match command {
        SessionCommand::Start { profile } => {
            let start = gateway
                .start_session(&profile.into_profile())
                .await
                .map_err(CliError::from)?;
            println!("✓ Session started: {}", start.session_id);
            if !start.welcome_message.trim().is_empty() {
                println!();
                println!("{}", start.welcome_message.trim());
            }
        }
        SessionCommand::Send {
            session_id,
            message,
        } => {
            let reply = gateway
                .send_message(&session_id, &message)
                .await
                .map_err(CliError::from)?;
            println!("{}", reply.response);
            if reply.session_ended {
                println!();
                println!("(session ended)");
                if let Some(summary) = reply.summary() {
                    println!("{summary}");
                }
            }
        }
        SessionCommand::Info { session_id } => {
            let info = gateway
                .session_info(&session_id)
                .await
                .map_err(CliError::from)?;
            println!("{}", format_session_info(&info));
        }
        SessionCommand::Messages { session_id } => {
            let messages = gateway
                .session_messages(&session_id)
                .await
                .map_err(CliError::from)?;
            if messages.is_empty() {
                println!("No messages in session {session_id}.");
            }
            for message in messages {
                match message.timestamp {
                    Some(ts) => println!("[{ts}] {}: {}", message.sender, message.message),
                    None => println!("{}: {}", message.sender, message.message),
                }
            }
        }
        SessionCommand::Feedback { session_id } => {
            let feedback = gateway
                .session_feedback(&session_id)
                .await
                .map_err(CliError::from)?;
            let text = format_feedback(&feedback);
            if text.is_empty() {
                println!("No feedback recorded for session {session_id} yet.");
            } else {
                println!("{text}");
            }
        }
    }
    Ok(())
}
