//! `credkeep cleanup` — delete expired credentials.

use crate::cli::output;
use crate::credential::CredentialManager;
use crate::errors::Result;

/// Execute the `cleanup` command.
pub fn execute(manager: &CredentialManager) -> Result<()> {
    match manager.cleanup_expired_credentials()? {
        0 => output::info("No expired credentials."),
        n => output::success(&format!("Removed {n} expired credential(s)")),
    }
    Ok(())
}
