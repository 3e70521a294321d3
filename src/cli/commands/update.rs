//! `credkeep update` — replace the value of an existing credential.

use crate::cli::{output, parse_metadata, read_secret_value};
use crate::credential::CredentialManager;
use crate::errors::Result;

/// Execute the `update` command.
pub fn execute(
    manager: &CredentialManager,
    key: &str,
    value: Option<&str>,
    meta: &[String],
) -> Result<()> {
    let metadata = parse_metadata(meta)?;
    let secret = read_secret_value(key, value)?;
    manager.update(key, &secret, metadata)?;

    output::success(&format!("Updated credential '{key}'"));
    Ok(())
}
