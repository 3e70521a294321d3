//! Per-credential key derivation.
//!
//! Two schemes are supported:
//! - **Name-derived**: `SHA-256(service_name || credential_key)`.  This
//!   only keeps credentials from sitting on disk in plaintext; anyone who
//!   knows the service and key names can recompute the key.
//! - **Master-derived**: HKDF-SHA256 over a secret master key, with the
//!   service and credential key bound into the `info` string.  The master
//!   key comes from a random keyfile or an Argon2id passphrase.

use hkdf::Hkdf;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{CredentialError, Result};

/// Length of derived keys (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Derive the encryption key for a credential from public identifiers.
pub fn derive_name_key(service: &str, key: &str) -> Zeroizing<[u8; KEY_LEN]> {
    let mut hasher = Sha256::new();
    hasher.update(service.as_bytes());
    hasher.update(key.as_bytes());
    Zeroizing::new(hasher.finalize().into())
}

/// Derive a per-credential encryption key from a master key.
///
/// `info` is `"credkeep-credential:<service>:<key>"` so every credential
/// in every service scope gets an independent key.
pub fn derive_credential_key(
    master_key: &[u8],
    service: &str,
    key: &str,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let info = format!("credkeep-credential:{service}:{key}");
    let hk = Hkdf::<Sha256>::new(None, master_key);

    let mut okm = Zeroizing::new([0u8; KEY_LEN]);
    hk.expand(info.as_bytes(), &mut okm[..])
        .map_err(|e| CredentialError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A 32-byte master key that zeroes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Derive the encryption key for one credential.
    pub fn derive_credential_key(&self, service: &str, key: &str) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        derive_credential_key(&self.bytes, service, key)
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_key_is_sha256_of_concatenation() {
        let expected: [u8; KEY_LEN] = Sha256::digest(b"svcgithub.api_key").into();
        assert_eq!(*derive_name_key("svc", "github.api_key"), expected);
    }

    #[test]
    fn master_key_debug_hides_bytes() {
        let mk = MasterKey::new([9u8; KEY_LEN]);
        assert_eq!(format!("{mk:?}"), "MasterKey(..)");
    }
}
