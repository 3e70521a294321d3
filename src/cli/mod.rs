//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::collections::BTreeMap;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::credential::CredentialManager;
use crate::errors::{CredentialError, Result};

/// credkeep CLI: encrypted credential store for service API keys and tokens.
#[derive(Parser)]
#[command(
    name = "credkeep",
    about = "Encrypted credential store for API keys and auth tokens",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: <config dir>/credkeep/credkeep.toml)
    #[arg(short, long, global = true, env = "CREDKEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Service scope for all credentials (overrides the config file)
    #[arg(short, long, global = true)]
    pub service: Option<String>,

    /// Credential directory for the file backend (overrides the config file)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Store credential files unencrypted
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Log backend operations to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Store a credential (add or replace)
    Set {
        /// Credential type: api, mcp, github, openai, anthropic, auth
        credential_type: String,
        /// Credential key (e.g. github.api_key)
        key: String,
        /// Secret value (omit to read from stdin or a prompt)
        value: Option<String>,
        /// Metadata entry as KEY=VALUE (repeatable)
        #[arg(short, long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,
        /// Expire after a duration (e.g. 30m, 1h, 7d)
        #[arg(short, long)]
        expires_in: Option<String>,
    },

    /// Show a credential's metadata, or its value with --show
    Get {
        /// Credential key
        key: String,
        /// Print the secret value instead of the metadata
        #[arg(long)]
        show: bool,
    },

    /// Replace the value of an existing credential, merging metadata
    Update {
        /// Credential key
        key: String,
        /// New secret value (omit to read from stdin or a prompt)
        value: Option<String>,
        /// Metadata entry as KEY=VALUE (repeatable)
        #[arg(short, long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,
    },

    /// Delete a credential
    Delete {
        /// Credential key
        key: String,
    },

    /// List stored credential keys
    List,

    /// Delete every stored credential
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Extend a credential's expiry to now + duration
    Refresh {
        /// Credential key
        key: String,
        /// New lifetime (e.g. 1h, 7d)
        duration: String,
    },

    /// Show the state of every stored credential
    Status,

    /// Delete expired credentials
    Cleanup,

    /// Fail if any stored credential has expired
    Validate,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from `--config` (or the default location) and apply
/// command-line overrides.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match cli.config.clone().or_else(Settings::default_path) {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };

    if let Some(service) = &cli.service {
        if service.trim().is_empty() {
            return Err(CredentialError::Config("--service must not be empty".into()));
        }
        settings.service_name = service.clone();
    }
    if let Some(dir) = &cli.dir {
        settings.credential_dir = Some(dir.clone());
    }
    if cli.no_encrypt {
        settings.encrypt = false;
    }

    Ok(settings)
}

/// Build the one manager this invocation uses.
pub fn open_manager(cli: &Cli) -> Result<CredentialManager> {
    CredentialManager::from_settings(&load_settings(cli)?)
}

/// Resolve a secret value from, in order:
/// 1. The command-line argument
/// 2. Piped stdin
/// 3. An interactive hidden prompt
///
/// Returns `Zeroizing<String>` so the value is wiped from memory on drop.
pub fn read_secret_value(key: &str, value: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(v) = value {
        output::warning("Value provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end().to_string();
        return Ok(Zeroizing::new(trimmed));
    }

    let v = dialoguer::Password::new()
        .with_prompt(format!("Enter value for {key}"))
        .interact()
        .map_err(|e| CredentialError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(v))
}

/// Parse repeated `KEY=VALUE` arguments into a metadata map.
pub fn parse_metadata(entries: &[String]) -> Result<BTreeMap<String, String>> {
    entries
        .iter()
        .map(|entry| match entry.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
            _ => Err(CredentialError::CommandFailed(format!(
                "invalid metadata '{entry}' — expected KEY=VALUE"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_metadata_pairs() {
        let meta = parse_metadata(&["endpoint=https://api.example.com/v1?a=b".into(), "team = core".into()])
            .unwrap();
        assert_eq!(meta["endpoint"], "https://api.example.com/v1?a=b");
        assert_eq!(meta["team"], " core");
    }

    #[test]
    fn rejects_malformed_metadata() {
        assert!(parse_metadata(&["novalue".into()]).is_err());
        assert!(parse_metadata(&["=x".into()]).is_err());
    }

    #[test]
    fn cli_overrides_settings() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cli = Cli::parse_from([
            "credkeep",
            "--config",
            tmp.path().join("missing.toml").to_str().unwrap(),
            "--service",
            "deploy",
            "--dir",
            tmp.path().to_str().unwrap(),
            "--no-encrypt",
            "list",
        ]);

        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.service_name, "deploy");
        assert_eq!(settings.credential_dir().unwrap(), tmp.path());
        assert!(!settings.encrypt);
    }
}
