//! `credkeep list` — print every stored credential key.

use crate::cli::output;
use crate::credential::CredentialManager;
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(manager: &CredentialManager) -> Result<()> {
    let keys = manager.list()?;
    output::print_keys(&keys);
    Ok(())
}
