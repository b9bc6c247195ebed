//! Application layer for mcp-runbook
//!
//! This crate contains the tool execution engine (use cases) and the port
//! definitions its adapters implement. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    audit_logger::{AuditEvent, AuditLogger, AuditProgressBridge, NoAuditLogger, output_preview},
    composite_progress::CompositeProgress,
    process_runner::{
        OutputMode, OutputStream, ProcessError, ProcessOutcome, ProcessRequest, ProcessRunner,
    },
    progress::{InvocationProgress, NoProgress, TracingProgress},
    secret_store::{InMemorySecretStore, SecretStore, SecretStoreError},
    tool_registrar::{ToolHandler, ToolRegistrar, ToolRegistration},
};
pub use use_cases::{
    compose_environment::{DEFAULT_SECRET_NAMESPACE, EnvironmentComposer, InheritedEnvironment},
    execute_step::{StepExecutor, StepInput},
    invoke_tool::ToolInvoker,
    registry::{ParsedArgs, ToolRegistry, parse_key_value_args},
};
