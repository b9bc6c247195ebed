//! Application settings data types
//!
//! These structs represent the exact structure of the settings TOML file.
//! Every field has a default, so an absent file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Settings validation errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("secret_namespace cannot be empty")]
    EmptyNamespace,

    #[error("server_name cannot be empty")]
    EmptyServerName,
}

/// Which secret store backs secret lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretBackend {
    /// OS credential store, service = namespace, user = key
    #[default]
    Keyring,
    /// TOML file with one table per namespace
    File,
    /// Environment variables named `<NAMESPACE>_<KEY>`
    Env,
}

/// Raw settings from TOML and `MCP_RUNBOOK_*` variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Namespace every secret lookup is made under
    pub secret_namespace: String,
    pub secret_backend: SecretBackend,
    /// Secrets file for the `file` backend
    pub secrets_file: Option<PathBuf>,
    /// Name announced to MCP clients
    pub server_name: String,
    /// JSONL audit log, disabled when unset
    pub audit_log: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            secret_namespace: "mcp-tools".to_string(),
            secret_backend: SecretBackend::Keyring,
            secrets_file: None,
            server_name: "MCP Server Runbook".to_string(),
            audit_log: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.secret_namespace.trim().is_empty() {
            return Err(SettingsError::EmptyNamespace);
        }
        if self.server_name.trim().is_empty() {
            return Err(SettingsError::EmptyServerName);
        }
        Ok(())
    }

    /// Secrets file to use: the configured one, else the platform default
    pub fn secrets_path(&self) -> Option<PathBuf> {
        self.secrets_file
            .clone()
            .or_else(|| dirs::config_dir().map(|d| d.join("mcp-runbook").join("secrets.toml")))
    }
}
