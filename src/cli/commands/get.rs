//! `credkeep get` — show a credential's metadata, or print its value.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::credential::CredentialManager;
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(manager: &CredentialManager, key: &str, show: bool) -> Result<()> {
    let mut credential = manager.retrieve(key)?;

    if show {
        let value = Zeroizing::new(credential.take_value());
        println!("{}", value.as_str());
    } else {
        output::print_credential_info(key, &credential, manager.now());
        output::tip(&format!("Run `credkeep get {key} --show` to print the value."));
    }

    Ok(())
}
