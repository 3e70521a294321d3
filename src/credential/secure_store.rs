//! OS secure-store backend.
//!
//! Credentials are serialized to compact JSON and handed opaquely to a
//! platform secret store keyed by `(service_name, credential_key)`:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring / KDE Wallet)
//!
//! Secret stores have no enumeration primitive, so `list` and `clear`
//! always fail with `UnsupportedOperation`.  Callers that need
//! enumeration must track keys themselves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::errors::{CredentialError, Result};

use super::backend::StorageBackend;
use super::model::Credential;

/// Name reported in `UnsupportedOperation` errors.
const BACKEND_NAME: &str = "keyring";

/// Minimal capability interface over a platform secret store.
pub trait SecretStore: Send + Sync {
    fn set(&self, service: &str, account: &str, secret: &str) -> Result<()>;

    /// `Ok(None)` when nothing is stored under `(service, account)`.
    fn get(&self, service: &str, account: &str) -> Result<Option<String>>;

    /// Forwarded as-is; a missing entry is reported as `NotFound`.
    fn delete(&self, service: &str, account: &str) -> Result<()>;
}

impl<S: SecretStore + ?Sized> SecretStore for Arc<S> {
    fn set(&self, service: &str, account: &str, secret: &str) -> Result<()> {
        (**self).set(service, account, secret)
    }

    fn get(&self, service: &str, account: &str) -> Result<Option<String>> {
        (**self).get(service, account)
    }

    fn delete(&self, service: &str, account: &str) -> Result<()> {
        (**self).delete(service, account)
    }
}

/// The operating system keyring, via the `keyring` crate.
#[cfg(feature = "keyring-store")]
#[derive(Debug, Default, Clone, Copy)]
pub struct OsKeyring;

#[cfg(feature = "keyring-store")]
impl OsKeyring {
    fn entry(service: &str, account: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(service, account)
            .map_err(|e| CredentialError::Keyring(format!("failed to create keyring entry: {e}")))
    }
}

#[cfg(feature = "keyring-store")]
impl SecretStore for OsKeyring {
    fn set(&self, service: &str, account: &str, secret: &str) -> Result<()> {
        Self::entry(service, account)?
            .set_password(secret)
            .map_err(|e| CredentialError::Keyring(format!("failed to store in keyring: {e}")))
    }

    fn get(&self, service: &str, account: &str) -> Result<Option<String>> {
        match Self::entry(service, account)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CredentialError::Keyring(format!(
                "failed to read from keyring: {e}"
            ))),
        }
    }

    fn delete(&self, service: &str, account: &str) -> Result<()> {
        match Self::entry(service, account)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Err(CredentialError::NotFound(account.to_string())),
            Err(e) => Err(CredentialError::Keyring(format!(
                "failed to delete from keyring: {e}"
            ))),
        }
    }
}

/// In-process secret store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: Mutex<HashMap<(String, String), String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries across all services.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SecretStore for MemorySecretStore {
    fn set(&self, service: &str, account: &str, secret: &str) -> Result<()> {
        self.lock()
            .insert((service.to_string(), account.to_string()), secret.to_string());
        Ok(())
    }

    fn get(&self, service: &str, account: &str) -> Result<Option<String>> {
        Ok(self
            .lock()
            .get(&(service.to_string(), account.to_string()))
            .cloned())
    }

    fn delete(&self, service: &str, account: &str) -> Result<()> {
        self.lock()
            .remove(&(service.to_string(), account.to_string()))
            .map(|_| ())
            .ok_or_else(|| CredentialError::NotFound(account.to_string()))
    }
}

/// Stores each credential as one secret-store entry.
#[derive(Debug)]
pub struct SecureStoreBackend<S> {
    service: String,
    store: S,
}

impl<S: SecretStore> SecureStoreBackend<S> {
    pub fn new(service: impl Into<String>, store: S) -> Self {
        Self {
            service: service.into(),
            store,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn unsupported(operation: &'static str) -> CredentialError {
        CredentialError::UnsupportedOperation {
            backend: BACKEND_NAME,
            operation,
        }
    }
}

impl<S: SecretStore> StorageBackend for SecureStoreBackend<S> {
    fn store(&self, key: &str, credential: &Credential) -> Result<()> {
        let mut record = credential.clone();
        record.encrypted = false;

        let json = zeroize::Zeroizing::new(
            serde_json::to_string(&record)
                .map_err(|e| CredentialError::Serialization(format!("credential '{key}': {e}")))?,
        );
        self.store.set(&self.service, key, &json)?;
        tracing::debug!(service = %self.service, key, "stored credential in secure store");
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Credential> {
        let json = self
            .store
            .get(&self.service, key)?
            .map(zeroize::Zeroizing::new)
            .ok_or_else(|| CredentialError::NotFound(key.to_string()))?;
        tracing::debug!(service = %self.service, key, "read credential from secure store");

        serde_json::from_str(&json)
            .map_err(|e| CredentialError::Serialization(format!("credential '{key}': {e}")))
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.store.delete(&self.service, key)
    }

    fn list(&self) -> Result<Vec<String>> {
        Err(Self::unsupported("list"))
    }

    fn clear(&self) -> Result<()> {
        Err(Self::unsupported("clear"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::model::CredentialType;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn backend() -> (Arc<MemorySecretStore>, SecureStoreBackend<Arc<MemorySecretStore>>) {
        let store = Arc::new(MemorySecretStore::new());
        (store.clone(), SecureStoreBackend::new("svc", store))
    }

    #[test]
    fn round_trips_through_secret_store() {
        let (store, backend) = backend();
        let cred = Credential::new(CredentialType::Auth, "t", "tok", BTreeMap::new(), Utc::now());

        backend.store("t", &cred).unwrap();
        assert_eq!(store.len(), 1);

        let raw = store.get("svc", "t").unwrap().unwrap();
        assert!(raw.starts_with('{'));
        assert!(!raw.contains('\n'));

        assert_eq!(backend.retrieve("t").unwrap().value, "tok");
    }

    #[test]
    fn entries_are_scoped_by_service() {
        let store = Arc::new(MemorySecretStore::new());
        let a = SecureStoreBackend::new("a", store.clone());
        let b = SecureStoreBackend::new("b", store);
        let cred = Credential::new(CredentialType::Api, "k", "v", BTreeMap::new(), Utc::now());

        a.store("k", &cred).unwrap();
        assert!(matches!(b.retrieve("k"), Err(CredentialError::NotFound(_))));
    }

    #[test]
    fn delete_surfaces_missing_entry() {
        let (_store, backend) = backend();
        assert!(matches!(
            backend.delete("missing"),
            Err(CredentialError::NotFound(_))
        ));
    }

    #[test]
    fn list_and_clear_are_unsupported() {
        let (_store, backend) = backend();
        assert!(matches!(
            backend.list(),
            Err(CredentialError::UnsupportedOperation { operation: "list", .. })
        ));
        assert!(matches!(
            backend.clear(),
            Err(CredentialError::UnsupportedOperation { operation: "clear", .. })
        ));
    }
}
