//! The storage capability shared by every backend.

use crate::errors::Result;

use super::model::Credential;

/// Persists and retrieves credentials by key.
///
/// Backends only round-trip records; expiry and type semantics live in
/// `CredentialManager`.  Implementations return the most specific error
/// they can: `NotFound` for a missing key, `UnsupportedOperation` for
/// operations the underlying store cannot perform.
pub trait StorageBackend: Send + Sync {
    fn store(&self, key: &str, credential: &Credential) -> Result<()>;

    fn retrieve(&self, key: &str) -> Result<Credential>;

    fn delete(&self, key: &str) -> Result<()>;

    /// Keys of every stored credential, sorted.
    fn list(&self) -> Result<Vec<String>>;

    /// Remove every stored credential.
    fn clear(&self) -> Result<()>;
}
