//! Credential storage and lifecycle.
//!
//! This module provides:
//! - The `Credential` record and `CredentialType` (`model`)
//! - The `StorageBackend` capability (`backend`) with two implementations:
//!   per-key encrypted files (`file`) and the OS secure store (`secure_store`)
//! - `CredentialManager`, which owns a backend and implements store,
//!   retrieve, update, delete, list, clear, expiry checks and refresh (`manager`)
//! - Status reports, cleanup and validation of expired entries (`status`)
//! - Service-specific shortcuts (`helpers`)

pub mod backend;
pub mod clock;
pub mod duration;
pub mod file;
pub mod helpers;
pub mod manager;
pub mod model;
pub mod secure_store;
pub mod status;

pub use backend::StorageBackend;
pub use clock::{Clock, ManualClock, SystemClock};
pub use duration::{expiry_after, format_duration, parse_duration};
pub use file::{file_name_for, FileBackend, CREDENTIAL_EXTENSION};
pub use manager::{CredentialManager, EXPIRES_IN_KEY};
pub use model::{Credential, CredentialState, CredentialType};
pub use secure_store::{MemorySecretStore, SecretStore, SecureStoreBackend};
pub use status::{CredentialStatus, EntryState, StatusReport};

#[cfg(feature = "keyring-store")]
pub use secure_store::OsKeyring;
