//! Cryptographic primitives for credkeep.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Per-credential key derivation, name- or master-key based (`keys`)
//! - Argon2id passphrase key derivation (`kdf`)
//! - Random master-key and salt files (`keyfile`)
//! - `CredentialCipher`, which ties a key source to a service scope (`cipher`)

pub mod cipher;
pub mod encryption;
pub mod kdf;
pub mod keyfile;
pub mod keys;

pub use cipher::CredentialCipher;
pub use encryption::{decrypt, encrypt, open, seal};
pub use kdf::{derive_master_key, Argon2Params};
pub use keys::{derive_credential_key, derive_name_key, MasterKey};
