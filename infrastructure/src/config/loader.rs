//! Settings loader with multi-source merging

use super::settings::{Settings, SettingsError};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Prefix of environment variables that override settings
pub const ENV_PREFIX: &str = "MCP_RUNBOOK_";

/// Settings loader that handles file discovery and merging
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `MCP_RUNBOOK_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. XDG config: `$XDG_CONFIG_HOME/mcp-runbook/config.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&Path>) -> Result<Settings, SettingsError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let settings: Settings = figment.extract().map_err(Box::new)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Get the global settings file path
    ///
    /// Returns XDG_CONFIG_HOME/mcp-runbook/config.toml if set,
    /// otherwise falls back to ~/.config/mcp-runbook/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mcp-runbook").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretBackend;
    use std::io::Write;

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "secret_namespace = \"from-file-ns\"").unwrap();
        writeln!(file, "secret_backend = \"env\"").unwrap();

        let settings = SettingsLoader::load(Some(file.path())).unwrap();
        assert_eq!(settings.secret_namespace, "from-file-ns");
        assert_eq!(settings.secret_backend, SecretBackend::Env);
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "secret_backend = 42").unwrap();

        assert!(matches!(
            SettingsLoader::load(Some(file.path())),
            Err(SettingsError::Load(_))
        ));
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = SettingsLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("mcp-runbook"));
    }
}
