use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CredentialError, Result};

/// Which storage backend holds the credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One (optionally encrypted) JSON file per credential.
    #[default]
    File,
    /// The platform secure credential store.
    Keyring,
}

/// Where the file backend gets its encryption keys from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeySource {
    /// Derived from the service and credential key names.
    #[default]
    Name,
    /// Random master key kept in `<credential_dir>/.master.key`.
    Keyfile,
    /// Argon2id over `$CREDKEEP_PASSPHRASE`, salted by `<credential_dir>/.salt`.
    Passphrase,
}

/// Credential store configuration, loaded from `credkeep.toml`.
///
/// Every field has a sensible default so credkeep works without any
/// config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Scope under which every credential of this process is stored.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default)]
    pub backend: BackendKind,

    /// Encrypt credential files at rest (file backend only).
    #[serde(default = "default_encrypt")]
    pub encrypt: bool,

    /// Credential directory; defaults to `<config dir>/credkeep/credentials`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_dir: Option<PathBuf>,

    #[serde(default)]
    pub key_source: KeySource,

    /// Lifetime given to `auth` credentials stored without `expires_in`.
    #[serde(default = "default_auth_token_ttl")]
    pub auth_token_ttl: String,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_service_name() -> String {
    "credkeep".to_string()
}

fn default_encrypt() -> bool {
    true
}

fn default_auth_token_ttl() -> String {
    "24h".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            backend: BackendKind::default(),
            encrypt: default_encrypt(),
            credential_dir: None,
            key_source: KeySource::default(),
            auth_token_ttl: default_auth_token_ttl(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file looked up in the user config directory.
    pub const FILE_NAME: &'static str = "credkeep.toml";

    /// Load settings from a TOML file.
    ///
    /// If the file does not exist, defaults are returned.  If it exists
    /// but cannot be parsed, an error is returned.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            CredentialError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.service_name.trim().is_empty() {
            return Err(CredentialError::Config(format!(
                "{}: service_name must not be empty",
                config_path.display()
            )));
        }

        Ok(settings)
    }

    /// Default location of the config file: `<config dir>/credkeep/credkeep.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("credkeep").join(Self::FILE_NAME))
    }

    /// Resolve the directory holding credential files.
    pub fn credential_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.credential_dir {
            return Ok(dir.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join("credkeep").join("credentials"))
            .ok_or_else(|| {
                CredentialError::Config(
                    "cannot determine a config directory — set credential_dir".into(),
                )
            })
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> crate::crypto::kdf::Argon2Params {
        crate::crypto::kdf::Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    /// Parse `auth_token_ttl` into a duration.
    pub fn auth_token_ttl(&self) -> Result<chrono::Duration> {
        crate::credential::parse_duration(&self.auth_token_ttl)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.service_name, "credkeep");
        assert_eq!(s.backend, BackendKind::File);
        assert!(s.encrypt);
        assert_eq!(s.key_source, KeySource::Name);
        assert_eq!(s.auth_token_ttl().unwrap(), chrono::Duration::hours(24));
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(&tmp.path().join(Settings::FILE_NAME)).unwrap();
        assert_eq!(settings.service_name, "credkeep");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(Settings::FILE_NAME);
        let config = r#"
service_name = "deploy-bot"
backend = "keyring"
encrypt = false
credential_dir = "/var/lib/deploy-bot/creds"
key_source = "keyfile"
auth_token_ttl = "1h30m"
argon2_iterations = 5
"#;
        fs::write(&path, config).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.service_name, "deploy-bot");
        assert_eq!(settings.backend, BackendKind::Keyring);
        assert!(!settings.encrypt);
        assert_eq!(
            settings.credential_dir().unwrap(),
            PathBuf::from("/var/lib/deploy-bot/creds")
        );
        assert_eq!(settings.key_source, KeySource::Keyfile);
        assert_eq!(settings.auth_token_ttl().unwrap(), chrono::Duration::minutes(90));
        assert_eq!(settings.argon2_params().iterations, 5);
        assert_eq!(settings.argon2_params().memory_kib, 65_536);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(Settings::FILE_NAME);
        fs::write(&path, "not valid {{toml").unwrap();

        assert!(matches!(
            Settings::load(&path),
            Err(CredentialError::Config(_))
        ));
    }

    #[test]
    fn load_errors_on_unknown_backend() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(Settings::FILE_NAME);
        fs::write(&path, "backend = \"s3\"\n").unwrap();

        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn load_rejects_blank_service_name() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(Settings::FILE_NAME);
        fs::write(&path, "service_name = \"  \"\n").unwrap();

        assert!(Settings::load(&path).is_err());
    }
}
