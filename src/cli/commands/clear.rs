//! `credkeep clear` — delete every stored credential.

use dialoguer::Confirm;

use crate::cli::output;
use crate::credential::CredentialManager;
use crate::errors::{CredentialError, Result};

/// Execute the `clear` command.
pub fn execute(manager: &CredentialManager, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete ALL credentials for '{}'?",
                manager.service()
            ))
            .default(false)
            .interact()
            .map_err(|e| CredentialError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    manager.clear()?;
    output::success(&format!("Cleared all credentials for '{}'", manager.service()));
    Ok(())
}
