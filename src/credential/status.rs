//! Batch maintenance over every stored credential: status reports,
//! expired-credential cleanup and validation.
//!
//! All three enumerate keys through `CredentialManager::list`, so they
//! fail with `UnsupportedOperation` on backends without enumeration.

use chrono::{DateTime, Utc};

use crate::errors::{CredentialError, Result};

use super::manager::CredentialManager;
use super::model::{CredentialState, CredentialType};

/// Health of one stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Active,
    Expired,
    /// The record exists but could not be read or decrypted.
    Unreadable,
}

/// Status of one credential, without its secret value.
#[derive(Debug, Clone)]
pub struct CredentialStatus {
    pub key: String,
    pub state: EntryState,
    pub credential_type: Option<CredentialType>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Why the record is unreadable, if it is.
    pub error: Option<String>,
}

/// Aggregate status of a service scope.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub service: String,
    pub checked_at: DateTime<Utc>,
    pub entries: Vec<CredentialStatus>,
}

impl StatusReport {
    fn count(&self, state: EntryState) -> usize {
        self.entries.iter().filter(|e| e.state == state).count()
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn active(&self) -> usize {
        self.count(EntryState::Active)
    }

    pub fn expired(&self) -> usize {
        self.count(EntryState::Expired)
    }

    pub fn unreadable(&self) -> usize {
        self.count(EntryState::Unreadable)
    }
}

impl CredentialManager {
    /// Describe every stored credential.
    pub fn status(&self) -> Result<StatusReport> {
        let now = self.now();
        let entries = self
            .list()?
            .into_iter()
            .map(|key| match self.load("inspect", &key) {
                Ok(credential) => CredentialStatus {
                    state: match credential.state_at(now) {
                        CredentialState::Active => EntryState::Active,
                        CredentialState::Expired => EntryState::Expired,
                    },
                    credential_type: Some(credential.credential_type),
                    description: Some(credential.description.clone()),
                    created_at: Some(credential.created_at),
                    updated_at: Some(credential.updated_at),
                    expires_at: credential.expires_at,
                    error: None,
                    key,
                },
                Err(e) => CredentialStatus {
                    state: EntryState::Unreadable,
                    credential_type: None,
                    description: None,
                    created_at: None,
                    updated_at: None,
                    expires_at: None,
                    error: Some(e.root().to_string()),
                    key,
                },
            })
            .collect();

        Ok(StatusReport {
            service: self.service().to_string(),
            checked_at: now,
            entries,
        })
    }

    /// Delete every expired credential and return how many were removed.
    ///
    /// Keys that cannot be checked or deleted are skipped, not fatal.
    pub fn cleanup_expired_credentials(&self) -> Result<usize> {
        let mut removed = 0;

        for key in self.list()? {
            match self.is_expired(&key) {
                Ok(true) => match self.delete(&key) {
                    Ok(()) => removed += 1,
                    Err(e) => tracing::warn!(key = %key, error = %e, "failed to delete expired credential"),
                },
                Ok(false) => {}
                Err(e) => tracing::warn!(key = %key, error = %e, "skipping unreadable credential"),
            }
        }

        tracing::info!(service = %self.service(), removed, "expired credential cleanup finished");
        Ok(removed)
    }

    /// Fail with `ExpiredCredentials` naming every expired key.
    pub fn validate_credentials(&self) -> Result<()> {
        let mut expired = Vec::new();

        for key in self.list()? {
            match self.is_expired(&key) {
                Ok(true) => expired.push(key),
                Ok(false) => {}
                Err(e) => tracing::warn!(key = %key, error = %e, "skipping unreadable credential"),
            }
        }

        if expired.is_empty() {
            Ok(())
        } else {
            Err(CredentialError::ExpiredCredentials(expired))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::clock::ManualClock;
    use crate::credential::file::FileBackend;
    use chrono::Duration;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn status_counts_each_state() {
        let tmp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::default());
        let backend = FileBackend::new(tmp.path(), None).unwrap();
        let m = CredentialManager::new("svc", Box::new(backend)).with_clock(clock.clone());

        let short = BTreeMap::from([("expires_in".to_string(), "1m".to_string())]);
        m.store(CredentialType::Api, "short", "v", short).unwrap();
        m.store(CredentialType::Api, "forever", "v", BTreeMap::new()).unwrap();
        std::fs::write(tmp.path().join("garbage.cred"), "{ not json").unwrap();

        clock.advance(Duration::minutes(2));
        let report = m.status().unwrap();

        assert_eq!(report.total(), 3);
        assert_eq!(report.active(), 1);
        assert_eq!(report.expired(), 1);
        assert_eq!(report.unreadable(), 1);

        let garbage = report.entries.iter().find(|e| e.key == "garbage").unwrap();
        assert!(garbage.error.as_deref().unwrap().contains("Serialization"));
    }
}
