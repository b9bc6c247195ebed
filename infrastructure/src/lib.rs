//! Infrastructure layer for mcp-runbook
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration loading, secret stores,
//! the shell process runner, audit logging and the MCP server.

pub mod config;
pub mod logging;
pub mod mcp;
pub mod process;
pub mod secrets;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigValidationError, ENV_PREFIX, RunbookLoader, SecretBackend, Settings,
    SettingsError, SettingsLoader,
};
pub use logging::JsonlAuditLogger;
pub use mcp::{RunbookMcpServer, input_schema};
pub use process::ShellProcessRunner;
pub use secrets::{
    EnvSecretStore, FileSecretStore, KeyringSecretStore, secret_store_from_settings,
};
