//! OS keyring secret store
//!
//! Secrets live in the platform credential store (Keychain, Credential
//! Manager, kernel keyutils) with the namespace as the service name and
//! the secret key as the user name.

use async_trait::async_trait;
use runbook_application::{SecretStore, SecretStoreError};

/// Secret store backed by the OS keyring
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringSecretStore;

impl KeyringSecretStore {
    pub fn new() -> Self {
        Self
    }
}

/// Map a keyring read result onto the port's contract
fn map_keyring_result(
    result: Result<String, keyring::Error>,
) -> Result<Option<String>, SecretStoreError> {
    match result {
        Ok(secret) => Ok(Some(secret)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(SecretStoreError::Unavailable(format!("keyring: {}", e))),
    }
}

#[async_trait]
impl SecretStore for KeyringSecretStore {
    async fn lookup(&self, namespace: &str, key: &str) -> Result<Option<String>, SecretStoreError> {
        let namespace = namespace.to_string();
        let key = key.to_string();

        // Platform keyring calls block (D-Bus, Security framework)
        let result = tokio::task::spawn_blocking(move || {
            keyring::Entry::new(&namespace, &key).and_then(|entry| entry.get_password())
        })
        .await
        .map_err(|e| SecretStoreError::Unavailable(format!("keyring task failed: {}", e)))?;

        map_keyring_result(result)
    }
}
