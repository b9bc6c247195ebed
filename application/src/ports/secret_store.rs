//! Secret store port
//!
//! Defines the lookup used to resolve a tool's declared secrets. Stores are
//! read-only from the engine's point of view and may be queried concurrently
//! by independent invocations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Failure of the store itself, as opposed to a missing key
#[derive(Error, Debug)]
pub enum SecretStoreError {
    #[error("Secret store unavailable: {0}")]
    Unavailable(String),

    #[error("Secret store is malformed: {0}")]
    Malformed(String),
}

/// Port for `(namespace, key) -> secret` lookups
///
/// `Ok(None)` means the key is absent. Implementations live in the
/// infrastructure layer.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn lookup(&self, namespace: &str, key: &str) -> Result<Option<String>, SecretStoreError>;
}

/// In-memory store, for tests and embedding
#[derive(Default)]
pub struct InMemorySecretStore {
    entries: HashMap<(String, String), String>,
    lookups: AtomicUsize,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(
        mut self,
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.entries
            .insert((namespace.into(), key.into()), value.into());
        self
    }

    /// Number of lookups served so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn lookup(&self, namespace: &str, key: &str) -> Result<Option<String>, SecretStoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }
}
