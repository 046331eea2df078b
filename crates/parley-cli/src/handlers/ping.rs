//! Ping command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Check that the interview service answers.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let url = ctx.gateway.base_url().to_string();
    match ctx.dialogue().test_connection().await {
        Ok(()) => {
            println!("✓ Interview service reachable at {url}");
            Ok(())
        }
        Err(error) => {
            println!("✗ Interview service not reachable at {url}");
            Err(CliError::from(error).into())
        }
    }
}
