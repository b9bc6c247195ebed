//! Environment composition.
//!
//! Builds the base environment of one invocation: the inherited process
//! environment overlaid with every secret the tool declares. Step-level
//! overrides are applied later by the step executor.

use crate::ports::secret_store::SecretStore;
use runbook_domain::{Environment, InvocationError, SecretResolutionError, ToolDefinition};
use std::sync::Arc;
use tracing::debug;

/// Namespace used for secret lookups unless configured otherwise
pub const DEFAULT_SECRET_NAMESPACE: &str = "mcp-tools";

/// Where the inherited layer of the environment comes from
#[derive(Debug, Clone)]
pub enum InheritedEnvironment {
    /// Snapshot of the host process environment at compose time
    Process,
    /// A fixed set of variables
    Fixed(Environment),
}

impl InheritedEnvironment {
    fn snapshot(&self) -> Environment {
        match self {
            InheritedEnvironment::Process => std::env::vars_os().collect(),
            InheritedEnvironment::Fixed(env) => env.clone(),
        }
    }
}

/// Resolves a tool's secrets and composes its base environment.
///
/// Secrets are looked up on every call and never cached, so all steps of one
/// invocation share a single consistent snapshot while separate invocations
/// observe store changes.
pub struct EnvironmentComposer {
    store: Arc<dyn SecretStore>,
    namespace: String,
    inherited: InheritedEnvironment,
}

impl EnvironmentComposer {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store,
            namespace: DEFAULT_SECRET_NAMESPACE.to_string(),
            inherited: InheritedEnvironment::Process,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_inherited(mut self, inherited: InheritedEnvironment) -> Self {
        self.inherited = inherited;
        self
    }

    /// Compose the base environment for one invocation of `tool`.
    ///
    /// Every declared secret must resolve to a non-empty value; the first
    /// that does not fails the whole invocation.
    pub async fn compose(&self, tool: &ToolDefinition) -> Result<Environment, InvocationError> {
        let mut resolved = Vec::with_capacity(tool.secrets.len());

        for secret in &tool.secrets {
            let value = self
                .store
                .lookup(&self.namespace, &secret.source)
                .await
                .map_err(|e| SecretResolutionError::Backend {
                    key: secret.source.clone(),
                    message: e.to_string(),
                })?;

            match value {
                Some(v) if !v.is_empty() => resolved.push((secret.target.clone(), v)),
                _ => {
                    return Err(SecretResolutionError::Missing {
                        key: secret.source.clone(),
                    }
                    .into());
                }
            }
        }

        debug!(
            "Resolved {} secret(s) for tool {} from namespace {}",
            resolved.len(),
            tool.name,
            self.namespace
        );

        Ok(self.inherited.snapshot().overlay(resolved))
    }
}
