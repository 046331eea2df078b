//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that parse CLI-specific input, call the gateway or the
//!   conversation driver, and format output for the terminal.

pub mod chat;
pub mod conversation;
pub mod converse;
pub mod ping;
pub mod session;
pub mod settings;
