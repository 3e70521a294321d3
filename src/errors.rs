use thiserror::Error;

/// All errors that can occur in credkeep.
#[derive(Debug, Error)]
pub enum CredentialError {
    // --- Caller errors ---
    #[error("Credential key and value must not be empty")]
    EmptyKeyOrValue,

    #[error("Invalid duration '{0}' — use a format like 90s, 30m, 1h30m or 7d")]
    InvalidDuration(String),

    // --- Lookup errors ---
    #[error("Credential '{0}' not found")]
    NotFound(String),

    #[error("Credential '{0}' has expired")]
    Expired(String),

    #[error("Expired credentials: {}", .0.join(", "))]
    ExpiredCredentials(Vec<String>),

    // --- Backend errors ---
    #[error("The {backend} backend does not support {operation}")]
    UnsupportedOperation {
        backend: &'static str,
        operation: &'static str,
    },

    #[error("Keyring error: {0}")]
    Keyring(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Config errors ---
    #[error("Config error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    // --- Context wrapper added by the manager ---
    #[error("failed to {operation} credential '{key}': {source}")]
    Operation {
        operation: &'static str,
        key: String,
        #[source]
        source: Box<CredentialError>,
    },
}

impl CredentialError {
    /// The innermost error, skipping any `Operation` context wrappers.
    pub fn root(&self) -> &CredentialError {
        match self {
            Self::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// Wrap a backend error with the operation and key it failed on.
    ///
    /// `NotFound` and `Expired` pass through unwrapped so callers can
    /// match on them directly.
    pub(crate) fn context(self, operation: &'static str, key: &str) -> Self {
        match self {
            Self::NotFound(_) | Self::Expired(_) => self,
            other => Self::Operation {
                operation,
                key: key.to_string(),
                source: Box::new(other),
            },
        }
    }
}

/// Convenience type alias for credkeep results.
pub type Result<T> = std::result::Result<T, CredentialError>;
