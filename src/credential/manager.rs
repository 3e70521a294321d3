//! High-level credential lifecycle.
//!
//! `CredentialManager` owns one storage backend for one service scope and
//! is the only place that interprets expiry and credential types.  It
//! keeps no cache: every call is a fresh round trip to the backend.
//!
//! There is no internal locking.  Share a manager across threads only
//! behind a caller-owned mutex.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::config::{BackendKind, Settings};
use crate::crypto::CredentialCipher;
use crate::errors::{CredentialError, Result};

use super::backend::StorageBackend;
use super::clock::{Clock, SystemClock};
use super::duration::{expiry_after, parse_duration};
use super::file::FileBackend;
use super::model::{Credential, CredentialType};

/// Metadata key carrying an expiry hint such as `"1h"` or `"7d"`.
pub const EXPIRES_IN_KEY: &str = "expires_in";

/// Lifetime of `auth` credentials stored without an explicit hint.
const DEFAULT_AUTH_TOKEN_TTL_HOURS: i64 = 24;

/// Facade over a storage backend implementing the credential lifecycle.
pub struct CredentialManager {
    service: String,
    backend: Box<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    auth_token_ttl: Duration,
}

impl CredentialManager {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Wrap an already-built backend.
    pub fn new(service: impl Into<String>, backend: Box<dyn StorageBackend>) -> Self {
        Self {
            service: service.into(),
            backend,
            clock: Arc::new(SystemClock),
            auth_token_ttl: Duration::hours(DEFAULT_AUTH_TOKEN_TTL_HOURS),
        }
    }

    /// Build the backend selected by `settings` and wrap it.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let backend: Box<dyn StorageBackend> = match settings.backend {
            BackendKind::File => {
                let dir = settings.credential_dir()?;
                crate::fsutil::create_private_dir(&dir)?;
                let cipher = if settings.encrypt {
                    Some(CredentialCipher::for_source(
                        settings.key_source,
                        &settings.service_name,
                        &dir,
                        &settings.argon2_params(),
                    )?)
                } else {
                    None
                };
                Box::new(FileBackend::new(dir, cipher)?)
            }
            BackendKind::Keyring => keyring_backend(&settings.service_name)?,
        };

        tracing::debug!(
            service = %settings.service_name,
            backend = ?settings.backend,
            encrypt = settings.encrypt,
            "credential manager ready"
        );

        Ok(Self::new(settings.service_name.clone(), backend)
            .with_auth_token_ttl(settings.auth_token_ttl()?))
    }

    /// Replace the clock used for expiry decisions.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Lifetime given to `auth` credentials stored without `expires_in`.
    pub fn with_auth_token_ttl(mut self, ttl: Duration) -> Self {
        self.auth_token_ttl = ttl;
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Current time according to the manager's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Store a new credential, replacing any record under `key`.
    ///
    /// `auth` credentials and credentials whose metadata carries an
    /// `expires_in` hint get an expiry of now + that duration.  If a
    /// record already exists its `created_at` is kept.
    pub fn store(
        &self,
        credential_type: CredentialType,
        key: &str,
        value: &str,
        metadata: BTreeMap<String, String>,
    ) -> Result<()> {
        validate_key(key)?;
        if value.is_empty() {
            return Err(CredentialError::EmptyKeyOrValue);
        }

        let now = self.now();
        let expires_at = match metadata.get(EXPIRES_IN_KEY) {
            Some(hint) => Some(expiry_after(now, parse_duration(hint)?)?),
            None if credential_type == CredentialType::Auth => {
                Some(expiry_after(now, self.auth_token_ttl)?)
            }
            None => None,
        };

        let mut credential = Credential::new(credential_type, key, value, metadata, now);
        credential.expires_at = expires_at;
        match self.backend.retrieve(key) {
            Ok(existing) => credential.created_at = existing.created_at.min(now),
            Err(CredentialError::NotFound(_)) => {}
            Err(e) => tracing::debug!(key, error = %e, "existing record unreadable, replacing it"),
        }

        self.backend
            .store(key, &credential)
            .map_err(|e| e.context("store", key))?;
        tracing::debug!(key, credential_type = %credential_type, expires_at = ?expires_at, "credential stored");
        Ok(())
    }

    /// Fetch a credential, failing with `Expired` once it is past its
    /// expiry.  Expired records are left in place.
    pub fn retrieve(&self, key: &str) -> Result<Credential> {
        let credential = self.load("retrieve", key)?;
        if credential.is_expired_at(self.now()) {
            tracing::debug!(key, "credential expired");
            return Err(CredentialError::Expired(key.to_string()));
        }
        Ok(credential)
    }

    /// Like `retrieve`, returning only the secret.
    pub fn retrieve_value(&self, key: &str) -> Result<String> {
        Ok(self.retrieve(key)?.take_value())
    }

    /// Replace the value of an existing credential and merge `metadata`
    /// into its existing metadata.
    ///
    /// A new `expires_in` hint recomputes the expiry; otherwise the
    /// existing expiry is kept.
    pub fn update(&self, key: &str, value: &str, metadata: BTreeMap<String, String>) -> Result<()> {
        validate_key(key)?;
        if value.is_empty() {
            return Err(CredentialError::EmptyKeyOrValue);
        }

        let now = self.now();
        let new_expiry = metadata
            .get(EXPIRES_IN_KEY)
            .map(|hint| parse_duration(hint).and_then(|d| expiry_after(now, d)))
            .transpose()?;

        let mut credential = self.load("update", key)?;
        credential.value = value.to_string();
        credential.metadata.extend(metadata);
        credential.updated_at = now.max(credential.created_at);
        if new_expiry.is_some() {
            credential.expires_at = new_expiry;
        }

        self.backend
            .store(key, &credential)
            .map_err(|e| e.context("update", key))?;
        tracing::debug!(key, "credential updated");
        Ok(())
    }

    /// Remove a credential.  On the file backend a missing key is not
    /// an error; the secure store reports whatever the platform does.
    pub fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.backend
            .delete(key)
            .map_err(|e| e.context("delete", key))?;
        tracing::debug!(key, "credential deleted");
        Ok(())
    }

    /// Keys of every stored credential.
    pub fn list(&self) -> Result<Vec<String>> {
        self.backend.list()
    }

    /// Remove every stored credential.
    pub fn clear(&self) -> Result<()> {
        self.backend.clear()?;
        tracing::info!(service = %self.service, "all credentials cleared");
        Ok(())
    }

    /// True only if the credential has an expiry in the past.
    pub fn is_expired(&self, key: &str) -> Result<bool> {
        Ok(self.load("check", key)?.is_expired_at(self.now()))
    }

    /// Set the expiry to now + `extend_by`, reviving expired credentials.
    pub fn refresh(&self, key: &str, extend_by: Duration) -> Result<()> {
        validate_key(key)?;
        if extend_by <= Duration::zero() {
            return Err(CredentialError::InvalidDuration(format!(
                "{}s",
                extend_by.num_seconds()
            )));
        }

        let now = self.now();
        let mut credential = self.load("refresh", key)?;
        credential.expires_at = Some(expiry_after(now, extend_by)?);
        credential.updated_at = now.max(credential.created_at);

        self.backend
            .store(key, &credential)
            .map_err(|e| e.context("refresh", key))?;
        tracing::debug!(key, expires_at = ?credential.expires_at, "credential refreshed");
        Ok(())
    }

    /// Backend read without the expiry check.
    pub(crate) fn load(&self, operation: &'static str, key: &str) -> Result<Credential> {
        validate_key(key)?;
        self.backend
            .retrieve(key)
            .map_err(|e| e.context(operation, key))
    }
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialManager")
            .field("service", &self.service)
            .field("auth_token_ttl", &self.auth_token_ttl)
            .finish_non_exhaustive()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(CredentialError::EmptyKeyOrValue);
    }
    Ok(())
}

#[cfg(feature = "keyring-store")]
fn keyring_backend(service: &str) -> Result<Box<dyn StorageBackend>> {
    use super::secure_store::{OsKeyring, SecureStoreBackend};
    Ok(Box::new(SecureStoreBackend::new(service, OsKeyring)))
}

#[cfg(not(feature = "keyring-store"))]
fn keyring_backend(_service: &str) -> Result<Box<dyn StorageBackend>> {
    Err(CredentialError::Config(
        "backend = \"keyring\" requires credkeep to be built with the `keyring-store` feature"
            .into(),
    ))
}
