//! Configuration loading for mcp-runbook
//!
//! Two independent inputs:
//!
//! - the runbook (`-f <file>`), parsed from YAML into the domain model
//! - application settings, merged by figment in priority order:
//!   1. `MCP_RUNBOOK_*` environment variables
//!   2. `--config <path>` specified file
//!   3. XDG config: `$XDG_CONFIG_HOME/mcp-runbook/config.toml`
//!   4. Default values

mod loader;
mod runbook;
mod settings;

pub use loader::{ENV_PREFIX, SettingsLoader};
pub use runbook::{ConfigError, ConfigValidationError, RunbookLoader};
pub use settings::{SecretBackend, Settings, SettingsError};
