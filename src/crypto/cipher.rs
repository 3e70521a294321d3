//! Per-credential sealing used by the encrypted file backend.
//!
//! A `CredentialCipher` knows the service scope and where its key
//! material comes from; callers only hand it a credential key and bytes.

use std::path::Path;

use zeroize::{Zeroize, Zeroizing};

use crate::config::KeySource;
use crate::errors::{CredentialError, Result};

use super::encryption;
use super::kdf::{self, Argon2Params};
use super::keyfile::{self, KEYFILE_NAME, SALT_FILE_NAME};
use super::keys::{self, MasterKey, KEY_LEN};

/// Environment variable holding the passphrase for the `passphrase` source.
pub const PASSPHRASE_ENV: &str = "CREDKEEP_PASSPHRASE";

/// Where per-credential encryption keys come from.
#[derive(Debug)]
enum KeyMaterial {
    /// SHA-256 over the service and credential key names.
    Name,
    /// HKDF over a secret master key.
    Master(MasterKey),
}

/// Encrypts and decrypts credential payloads for one service scope.
#[derive(Debug)]
pub struct CredentialCipher {
    service: String,
    material: KeyMaterial,
}

impl CredentialCipher {
    /// Keys derived from `(service, key)` names alone.
    pub fn name_derived(service: &str) -> Self {
        Self {
            service: service.to_string(),
            material: KeyMaterial::Name,
        }
    }

    /// Keys derived from a secret master key.
    pub fn with_master_key(service: &str, master_key: MasterKey) -> Self {
        Self {
            service: service.to_string(),
            material: KeyMaterial::Master(master_key),
        }
    }

    /// Build the cipher for a configured key source.
    ///
    /// `dir` is the credential directory; the keyfile and salt live there.
    pub fn for_source(
        source: KeySource,
        service: &str,
        dir: &Path,
        argon2_params: &Argon2Params,
    ) -> Result<Self> {
        match source {
            KeySource::Name => Ok(Self::name_derived(service)),
            KeySource::Keyfile => {
                let master = keyfile::load_or_create_keyfile(&dir.join(KEYFILE_NAME))?;
                Ok(Self::with_master_key(service, master))
            }
            KeySource::Passphrase => {
                let passphrase = Zeroizing::new(std::env::var(PASSPHRASE_ENV).map_err(|_| {
                    CredentialError::Config(format!(
                        "key_source = \"passphrase\" requires {PASSPHRASE_ENV} to be set"
                    ))
                })?);
                if passphrase.is_empty() {
                    return Err(CredentialError::Config(format!(
                        "{PASSPHRASE_ENV} must not be empty"
                    )));
                }
                let salt = keyfile::load_or_create_salt(&dir.join(SALT_FILE_NAME))?;
                let mut master_bytes =
                    kdf::derive_master_key(passphrase.as_bytes(), &salt, argon2_params)?;
                let master = MasterKey::new(master_bytes);
                master_bytes.zeroize();
                Ok(Self::with_master_key(service, master))
            }
        }
    }

    /// The service scope this cipher derives keys for.
    pub fn service(&self) -> &str {
        &self.service
    }

    fn key_for(&self, key: &str) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        match &self.material {
            KeyMaterial::Name => Ok(keys::derive_name_key(&self.service, key)),
            KeyMaterial::Master(master) => master.derive_credential_key(&self.service, key),
        }
    }

    /// Encrypt `plaintext` for credential `key`; returns base64 text.
    pub fn seal(&self, key: &str, plaintext: &[u8]) -> Result<String> {
        let derived = self.key_for(key)?;
        encryption::seal(&derived[..], plaintext)
    }

    /// Decrypt base64 text previously produced by `seal` for `key`.
    pub fn open(&self, key: &str, encoded: &str) -> Result<Vec<u8>> {
        let derived = self.key_for(key)?;
        encryption::open(&derived[..], encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn name_derived_round_trip() {
        let cipher = CredentialCipher::name_derived("svc");
        let sealed = cipher.seal("github.api_key", b"payload").unwrap();
        assert_eq!(cipher.open("github.api_key", &sealed).unwrap(), b"payload");
    }

    #[test]
    fn other_key_name_cannot_open() {
        let cipher = CredentialCipher::name_derived("svc");
        let sealed = cipher.seal("a", b"payload").unwrap();
        assert!(matches!(
            cipher.open("b", &sealed),
            Err(CredentialError::DecryptionFailed)
        ));
    }

    #[test]
    fn keyfile_source_persists_master_key() {
        let tmp = TempDir::new().unwrap();
        let params = Argon2Params::default();

        let first = CredentialCipher::for_source(KeySource::Keyfile, "svc", tmp.path(), &params)
            .unwrap();
        let sealed = first.seal("k", b"secret").unwrap();

        let second = CredentialCipher::for_source(KeySource::Keyfile, "svc", tmp.path(), &params)
            .unwrap();
        assert_eq!(second.open("k", &sealed).unwrap(), b"secret");
        assert!(tmp.path().join(KEYFILE_NAME).exists());
    }

    #[test]
    fn keyfile_source_differs_from_name_source() {
        let tmp = TempDir::new().unwrap();
        let keyed = CredentialCipher::for_source(
            KeySource::Keyfile,
            "svc",
            tmp.path(),
            &Argon2Params::default(),
        )
        .unwrap();
        let sealed = keyed.seal("k", b"secret").unwrap();

        let named = CredentialCipher::name_derived("svc");
        assert!(named.open("k", &sealed).is_err());
    }
}
