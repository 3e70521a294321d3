//! The `Credential` record and its type classification.
//!
//! A credential is stored as a JSON object:
//!
//! ```text
//! { "type", "value", "metadata", "created_at", "updated_at",
//!   "expires_at" (nullable), "encrypted", "description" }
//! ```
//!
//! Timestamps are RFC 3339 / ISO-8601 UTC.  The secret `value` is wiped
//! from memory when the record is dropped and never printed by `Debug`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::errors::CredentialError;

/// Classification of a stored secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialType {
    Api,
    Mcp,
    Github,
    Openai,
    Anthropic,
    Auth,
}

impl CredentialType {
    pub const ALL: [CredentialType; 6] = [
        Self::Api,
        Self::Mcp,
        Self::Github,
        Self::Openai,
        Self::Anthropic,
        Self::Auth,
    ];

    /// The lowercase tag used on disk and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Mcp => "mcp",
            Self::Github => "github",
            Self::Openai => "openai",
            Self::Anthropic => "anthropic",
            Self::Auth => "auth",
        }
    }

    /// Human-readable label used to build descriptions.
    pub fn label(self) -> &'static str {
        match self {
            Self::Api => "API key",
            Self::Mcp => "MCP server credential",
            Self::Github => "GitHub token",
            Self::Openai => "OpenAI API key",
            Self::Anthropic => "Anthropic API key",
            Self::Auth => "Authentication token",
        }
    }

    /// Pick the most specific type for an external service name.
    pub fn for_service(service: &str) -> Self {
        match service.to_ascii_lowercase().as_str() {
            "github" => Self::Github,
            "openai" => Self::Openai,
            "anthropic" => Self::Anthropic,
            _ => Self::Api,
        }
    }

    /// Description derived from the type and credential key.
    pub fn describe(self, key: &str) -> String {
        format!("{} ({key})", self.label())
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialType {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CredentialError::Config(format!(
                    "unknown credential type '{s}' — expected one of: api, mcp, github, openai, anthropic, auth"
                ))
            })
    }
}

/// Lifecycle state of a credential at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    Active,
    Expired,
}

/// A named secret plus metadata, audit timestamps and optional expiry.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    #[serde(rename = "type")]
    pub credential_type: CredentialType,

    pub value: String,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// `None` means the credential never expires.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// Whether the record was encrypted at rest.
    #[serde(default)]
    pub encrypted: bool,

    #[serde(default)]
    pub description: String,
}

impl Credential {
    /// Build a fresh record with both timestamps set to `now`.
    pub fn new(
        credential_type: CredentialType,
        key: &str,
        value: impl Into<String>,
        metadata: BTreeMap<String, String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            credential_type,
            value: value.into(),
            metadata,
            created_at: now,
            updated_at: now,
            expires_at: None,
            encrypted: false,
            description: credential_type.describe(key),
        }
    }

    /// True only if an expiry is set and `now` is past it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> CredentialState {
        if self.is_expired_at(now) {
            CredentialState::Expired
        } else {
            CredentialState::Active
        }
    }

    /// Time left before expiry; `None` for credentials that never expire.
    /// Negative once the credential has expired.
    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at.map(|expires| expires - now)
    }

    /// Move the secret out of the record, leaving an empty string behind.
    pub fn take_value(&mut self) -> String {
        std::mem::take(&mut self.value)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("credential_type", &self.credential_type)
            .field("value", &"[REDACTED]")
            .field("metadata", &self.metadata)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("expires_at", &self.expires_at)
            .field("encrypted", &self.encrypted)
            .field("description", &self.description)
            .finish()
    }
}

impl Drop for Credential {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}
