//! `credkeep status` — table of every credential and its state.

use crate::cli::output;
use crate::credential::CredentialManager;
use crate::errors::Result;

/// Execute the `status` command.
pub fn execute(manager: &CredentialManager) -> Result<()> {
    let report = manager.status()?;
    output::print_status_table(&report);

    if report.expired() > 0 {
        output::tip("Run `credkeep cleanup` to delete expired credentials.");
    }
    Ok(())
}
