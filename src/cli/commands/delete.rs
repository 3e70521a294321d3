//! `credkeep delete` — remove a credential.

use crate::cli::output;
use crate::credential::CredentialManager;
use crate::errors::Result;

/// Execute the `delete` command.
pub fn execute(manager: &CredentialManager, key: &str) -> Result<()> {
    manager.delete(key)?;
    output::success(&format!("Deleted credential '{key}'"));
    Ok(())
}
