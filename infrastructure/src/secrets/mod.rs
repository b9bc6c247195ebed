//! Secret store adapters
//!
//! Implementations of the [`SecretStore`] port, selected by the
//! `secret_backend` setting.

mod env_store;
mod file_store;
mod keyring_store;

pub use env_store::EnvSecretStore;
pub use file_store::FileSecretStore;
pub use keyring_store::KeyringSecretStore;

use crate::config::{SecretBackend, Settings};
use runbook_application::SecretStore;
use std::sync::Arc;
use tracing::debug;

/// Build the secret store selected by `settings`
pub fn secret_store_from_settings(settings: &Settings) -> Arc<dyn SecretStore> {
    match settings.secret_backend {
        SecretBackend::Keyring => {
            debug!("Using OS keyring secret store");
            Arc::new(KeyringSecretStore::new())
        }
        SecretBackend::Env => {
            debug!("Using environment secret store");
            Arc::new(EnvSecretStore::new())
        }
        SecretBackend::File => match settings.secrets_path() {
            Some(path) => {
                let store = FileSecretStore::new(path);
                debug!("Using secrets file {}", store.path().display());
                Arc::new(store)
            }
            None => {
                debug!("No config directory; falling back to environment secret store");
                Arc::new(EnvSecretStore::new())
            }
        },
    }
}
