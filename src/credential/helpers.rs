//! Service-specific shortcuts built on a caller-owned `CredentialManager`.

use std::collections::BTreeMap;

use chrono::Duration;

use crate::errors::Result;

use super::duration::format_duration;
use super::manager::{CredentialManager, EXPIRES_IN_KEY};
use super::model::CredentialType;

/// Key under which the session auth token is stored.
pub const AUTH_TOKEN_KEY: &str = "auth.token";

/// Key of the API key for an external service, e.g. `github.api_key`.
pub fn api_key_name(service: &str) -> String {
    format!("{service}.api_key")
}

/// Key of the credential for an MCP server, e.g. `mcp.filesystem`.
pub fn mcp_key_name(server: &str) -> String {
    format!("mcp.{server}")
}

/// Store the API key for an external service.
pub fn store_api_key(manager: &CredentialManager, service: &str, api_key: &str) -> Result<()> {
    let metadata = BTreeMap::from([("service".to_string(), service.to_string())]);
    manager.store(
        CredentialType::for_service(service),
        &api_key_name(service),
        api_key,
        metadata,
    )
}

pub fn get_api_key(manager: &CredentialManager, service: &str) -> Result<String> {
    manager.retrieve_value(&api_key_name(service))
}

/// Store the session auth token; without `ttl` the manager's default applies.
pub fn store_auth_token(
    manager: &CredentialManager,
    token: &str,
    ttl: Option<Duration>,
) -> Result<()> {
    let mut metadata = BTreeMap::new();
    if let Some(ttl) = ttl {
        metadata.insert(EXPIRES_IN_KEY.to_string(), format_duration(ttl));
    }
    manager.store(CredentialType::Auth, AUTH_TOKEN_KEY, token, metadata)
}

pub fn get_auth_token(manager: &CredentialManager) -> Result<String> {
    manager.retrieve_value(AUTH_TOKEN_KEY)
}

/// Store the credential for an MCP server, optionally noting its endpoint.
pub fn store_mcp_credential(
    manager: &CredentialManager,
    server: &str,
    secret: &str,
    endpoint: Option<&str>,
) -> Result<()> {
    let mut metadata = BTreeMap::from([("server".to_string(), server.to_string())]);
    if let Some(endpoint) = endpoint {
        metadata.insert("endpoint".to_string(), endpoint.to_string());
    }
    manager.store(CredentialType::Mcp, &mcp_key_name(server), secret, metadata)
}

pub fn get_mcp_credential(manager: &CredentialManager, server: &str) -> Result<String> {
    manager.retrieve_value(&mcp_key_name(server))
}
