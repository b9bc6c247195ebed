//! Tool registration port
//!
//! The boundary to an RPC transport: each tool is handed over once, at
//! startup, as plain data plus an invocable handler.

use async_trait::async_trait;
use runbook_domain::{InvocationError, ParameterDescriptor, ParameterValues};
use std::sync::Arc;

/// Invocable side of a registered tool
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Run the tool with caller-supplied parameters and return its output
    async fn call(&self, parameters: ParameterValues) -> Result<String, InvocationError>;
}

/// Everything a transport needs to publish and dispatch one tool
#[derive(Clone)]
pub struct ToolRegistration {
    pub name: String,
    pub description: String,
    /// Parameter contract, in declaration order
    pub parameters: Vec<ParameterDescriptor>,
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for ToolRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistration")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Port implemented by RPC transports that accept tool registrations
pub trait ToolRegistrar {
    fn register(&mut self, registration: ToolRegistration);
}
