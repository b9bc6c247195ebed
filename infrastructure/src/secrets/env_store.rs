//! Environment variable secret store
//!
//! A secret `api_token` in namespace `mcp-tools` is read from
//! `MCP_TOOLS_API_TOKEN`.

use async_trait::async_trait;
use runbook_application::{SecretStore, SecretStoreError};
use std::collections::HashMap;

/// Secret store backed by environment variables
pub struct EnvSecretStore {
    /// Fixed variables; the live process environment when `None`
    vars: Option<HashMap<String, String>>,
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self { vars: None }
    }

    /// Store that reads from `vars` instead of the process environment
    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        Self { vars: Some(vars) }
    }

    /// Variable name a `(namespace, key)` pair is read from
    pub fn variable_name(namespace: &str, key: &str) -> String {
        format!("{}_{}", namespace, key)
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl Default for EnvSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn lookup(&self, namespace: &str, key: &str) -> Result<Option<String>, SecretStoreError> {
        let name = Self::variable_name(namespace, key);
        Ok(match &self.vars {
            Some(vars) => vars.get(&name).cloned(),
            None => std::env::var(&name).ok(),
        })
    }
}
