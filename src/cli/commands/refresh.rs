//! `credkeep refresh` — push a credential's expiry out to now + duration.

use crate::cli::output;
use crate::credential::{parse_duration, CredentialManager};
use crate::errors::Result;

/// Execute the `refresh` command.
pub fn execute(manager: &CredentialManager, key: &str, duration: &str) -> Result<()> {
    let extend_by = parse_duration(duration)?;
    manager.refresh(key, extend_by)?;
    output::success(&format!("Credential '{key}' now expires in {duration}"));
    Ok(())
}
