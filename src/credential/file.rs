//! Encrypted file backend: one file per credential.
//!
//! Layout of the credential directory (owner-only, `0700`):
//!
//! ```text
//! <dir>/github.api_key.cred     one record per key
//! <dir>/.master.key             keyfile key source only
//! <dir>/.salt                   passphrase key source only
//! ```
//!
//! Each `.cred` file (`0600`) holds either the credential JSON or, with
//! encryption enabled, base64 of `nonce || ciphertext || tag` whose
//! plaintext is that JSON.  Writes go through a temp file + rename so a
//! failed write never leaves a half-written record behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::crypto::CredentialCipher;
use crate::errors::{CredentialError, Result};
use crate::fsutil;

use super::backend::StorageBackend;
use super::model::Credential;

/// Suffix of every credential file.
pub const CREDENTIAL_EXTENSION: &str = ".cred";

/// Map a credential key to its file name.
///
/// Path separators (`/`, `\`, `:`) become `_` so a key can never
/// escape the credential directory.
pub fn file_name_for(key: &str) -> String {
    let safe: String = key
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            other => other,
        })
        .collect();
    format!("{safe}{CREDENTIAL_EXTENSION}")
}

/// Recover a key from a directory entry name, if it is a credential file.
///
/// Temp files (`.<name>.<random>.tmp`) and key material (`.master.key`, `.salt`)
/// never carry the suffix, so they are skipped.
fn key_from_file_name(name: &str) -> Option<&str> {
    name.strip_suffix(CREDENTIAL_EXTENSION)
        .filter(|key| !key.is_empty())
}

/// Stores credentials as individual files under a private directory.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
    cipher: Option<CredentialCipher>,
}

impl FileBackend {
    /// Open (creating if needed) the credential directory at `dir`.
    ///
    /// Pass `Some(cipher)` to encrypt records at rest.
    pub fn new(dir: impl Into<PathBuf>, cipher: Option<CredentialCipher>) -> Result<Self> {
        let dir = dir.into();
        fsutil::create_private_dir(&dir)?;
        Ok(Self { dir, cipher })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_encrypted(&self) -> bool {
        self.cipher.is_some()
    }

    /// Full path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(file_name_for(key))
    }

    fn encode(&self, key: &str, credential: &Credential) -> Result<Vec<u8>> {
        let mut record = credential.clone();
        record.encrypted = self.cipher.is_some();

        let json = serde_json::to_vec_pretty(&record)
            .map_err(|e| CredentialError::Serialization(format!("credential '{key}': {e}")))?;

        match &self.cipher {
            Some(cipher) => {
                let json = Zeroizing::new(json);
                Ok(cipher.seal(key, &json)?.into_bytes())
            }
            None => Ok(json),
        }
    }

    fn decode(&self, key: &str, contents: &str) -> Result<Credential> {
        let parse = |bytes: &[u8]| {
            serde_json::from_slice::<Credential>(bytes)
                .map_err(|e| CredentialError::Serialization(format!("credential '{key}': {e}")))
        };

        match &self.cipher {
            Some(cipher) => {
                let plaintext = Zeroizing::new(cipher.open(key, contents)?);
                parse(plaintext.as_slice())
            }
            None => parse(contents.as_bytes()),
        }
    }

    /// Paths of every credential file currently in the directory.
    fn credential_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(key) = name.to_str().and_then(key_from_file_name) {
                files.push((key.to_string(), entry.path()));
            }
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }
}

impl StorageBackend for FileBackend {
    fn store(&self, key: &str, credential: &Credential) -> Result<()> {
        let bytes = self.encode(key, credential)?;
        let path = self.path_for(key);
        fsutil::write_private_atomic(&path, &bytes)?;
        tracing::debug!(key, path = %path.display(), encrypted = self.is_encrypted(), "stored credential file");
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Credential> {
        let path = self.path_for(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => Zeroizing::new(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CredentialError::NotFound(key.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(key, path = %path.display(), "read credential file");
        self.decode(key, &contents)
    }

    fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {
                tracing::debug!(key, "deleted credential file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self
            .credential_files()?
            .into_iter()
            .map(|(key, _)| key)
            .collect())
    }

    fn clear(&self) -> Result<()> {
        for (key, path) in self.credential_files()? {
            match fs::remove_file(&path) {
                Ok(()) => tracing::debug!(key = %key, "cleared credential file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
