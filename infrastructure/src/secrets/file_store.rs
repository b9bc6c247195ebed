//! TOML file secret store
//!
//! ```toml
//! [mcp-tools]
//! api_token = "..."
//! ```
//!
//! The file is read on every lookup so that rotated secrets are picked up
//! without a restart.

use async_trait::async_trait;
use runbook_application::{SecretStore, SecretStoreError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Secret store backed by a TOML file with one table per namespace
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn lookup(&self, namespace: &str, key: &str) -> Result<Option<String>, SecretStoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            // No secrets file means no secrets
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SecretStoreError::Unavailable(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let table: toml::Table = toml::from_str(&content).map_err(|e| {
            SecretStoreError::Malformed(format!("{}: {}", self.path.display(), e))
        })?;

        let Some(section) = table.get(namespace) else {
            return Ok(None);
        };
        let Some(section) = section.as_table() else {
            return Err(SecretStoreError::Malformed(format!(
                "[{}] in {} is not a table",
                namespace,
                self.path.display()
            )));
        };

        match section.get(key) {
            None => Ok(None),
            Some(toml::Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(SecretStoreError::Malformed(format!(
                "{}.{} in {} is not a string",
                namespace,
                key,
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn store_with(content: &str) -> (tempfile::NamedTempFile, FileSecretStore) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let store = FileSecretStore::new(file.path());
        (file, store)
    }

    #[tokio::test]
    async fn test_lookup_by_namespace() {
        let (_file, store) = store_with(
            r#"
[mcp-tools]
api_token = "abc123"

[other]
api_token = "wrong"
"#,
        );

        assert_eq!(
            store.lookup("mcp-tools", "api_token").await.unwrap().as_deref(),
            Some("abc123")
        );
        assert!(store.lookup("mcp-tools", "missing").await.unwrap().is_none());
        assert!(store.lookup("absent-ns", "api_token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_file_has_no_secrets() {
        let store = FileSecretStore::new("/nonexistent/secrets.toml");
        assert!(store.lookup("mcp-tools", "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reads_changes_between_lookups() {
        let (mut file, store) = store_with("[mcp-tools]\ntoken = \"old\"\n");
        assert_eq!(
            store.lookup("mcp-tools", "token").await.unwrap().as_deref(),
            Some("old")
        );

        std::fs::write(file.path(), "[mcp-tools]\ntoken = \"new\"\n").unwrap();
        file.flush().unwrap();
        assert_eq!(
            store.lookup("mcp-tools", "token").await.unwrap().as_deref(),
            Some("new")
        );
    }

    #[tokio::test]
    async fn test_non_string_value_is_malformed() {
        let (_file, store) = store_with("[mcp-tools]\nport = 8080\n");
        assert!(matches!(
            store.lookup("mcp-tools", "port").await,
            Err(SecretStoreError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_toml_is_malformed() {
        let (_file, store) = store_with("not = [valid");
        assert!(store.lookup("mcp-tools", "x").await.is_err());
    }
}
