//! `credkeep validate` — exit non-zero if any credential has expired.

use crate::cli::output;
use crate::credential::CredentialManager;
use crate::errors::Result;

/// Execute the `validate` command.
pub fn execute(manager: &CredentialManager) -> Result<()> {
    manager.validate_credentials()?;
    output::success("All credentials are valid");
    Ok(())
}
