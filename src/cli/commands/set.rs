//! `credkeep set` — add or replace a credential.

use crate::cli::{output, parse_metadata, read_secret_value};
use crate::credential::{CredentialManager, CredentialType, EXPIRES_IN_KEY};
use crate::errors::Result;

/// Execute the `set` command.
pub fn execute(
    manager: &CredentialManager,
    credential_type: &str,
    key: &str,
    value: Option<&str>,
    meta: &[String],
    expires_in: Option<&str>,
) -> Result<()> {
    let credential_type: CredentialType = credential_type.parse()?;
    let mut metadata = parse_metadata(meta)?;
    if let Some(hint) = expires_in {
        metadata.insert(EXPIRES_IN_KEY.to_string(), hint.to_string());
    }

    let secret = read_secret_value(key, value)?;
    manager.store(credential_type, key, &secret, metadata)?;

    output::success(&format!(
        "Stored {} '{}' for {}",
        credential_type.label(),
        key,
        manager.service()
    ));
    Ok(())
}
