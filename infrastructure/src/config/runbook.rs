//! Runbook file loading
//!
//! Parses the YAML runbook into the domain model and rejects runbooks with
//! fatal [`ConfigIssue`]s. Warnings are logged and the runbook is accepted.

use runbook_domain::{ConfigIssue, RunbookConfig, Severity};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Runbook validation errors
#[derive(Debug)]
pub struct ConfigValidationError {
    /// Every issue found, errors and warnings alike
    pub issues: Vec<ConfigIssue>,
}

impl ConfigValidationError {
    pub fn errors(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid runbook")?;
        for issue in self.errors() {
            write!(f, "\n  - {}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigValidationError {}

/// Errors raised while loading a runbook
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read runbook {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse runbook {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Invalid(#[from] ConfigValidationError),
}

/// Loads and validates runbook files
pub struct RunbookLoader;

impl RunbookLoader {
    /// Read, parse and validate the runbook at `path`
    pub fn load(path: &Path) -> Result<RunbookConfig, ConfigError> {
        debug!("Loading runbook from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse and validate runbook text; `origin` is only used in messages
    pub fn parse(content: &str, origin: &Path) -> Result<RunbookConfig, ConfigError> {
        let config: RunbookConfig =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;

        let issues = config.validate();
        if RunbookConfig::has_errors(&issues) {
            return Err(ConfigValidationError { issues }.into());
        }
        for issue in &issues {
            warn!("{}", issue);
        }

        Ok(config)
    }
}
