//! Random master-key files stored next to the credentials.
//!
//! The `keyfile` key source keeps a 32-byte random master key in
//! `<credential_dir>/.master.key`; the `passphrase` key source keeps its
//! Argon2id salt in `<credential_dir>/.salt`.  Both are generated on
//! first use with owner-only permissions and never overwritten.

use std::fs;
use std::path::Path;

use crate::errors::{CredentialError, Result};
use crate::fsutil;

use super::kdf::random_bytes;
use super::keys::{MasterKey, KEY_LEN};

/// File name of the random master key inside the credential directory.
pub const KEYFILE_NAME: &str = ".master.key";

/// File name of the passphrase salt inside the credential directory.
pub const SALT_FILE_NAME: &str = ".salt";

/// Read a 32-byte secret file, creating it with random bytes if absent.
fn load_or_create(path: &Path) -> Result<[u8; KEY_LEN]> {
    if !path.exists() {
        let fresh = random_bytes::<KEY_LEN>();
        if fsutil::create_private_new(path, &fresh)? {
            tracing::debug!(path = %path.display(), "generated new key material");
            return Ok(fresh);
        }
    }

    let data = fs::read(path)?;
    data.as_slice().try_into().map_err(|_| {
        CredentialError::KeyDerivationFailed(format!(
            "{} must be exactly {KEY_LEN} bytes, got {}",
            path.display(),
            data.len()
        ))
    })
}

/// Load the master key from `path`, generating one if it does not exist.
pub fn load_or_create_keyfile(path: &Path) -> Result<MasterKey> {
    load_or_create(path).map(MasterKey::new)
}

/// Load the passphrase salt from `path`, generating one if it does not exist.
pub fn load_or_create_salt(path: &Path) -> Result<[u8; KEY_LEN]> {
    load_or_create(path)
}
