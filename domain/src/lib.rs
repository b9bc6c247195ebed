//! Domain layer for mcp-runbook
//!
//! This crate contains the runbook model and the pure parts of the tool
//! execution engine. It has no dependencies on infrastructure or
//! presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Runbook
//!
//! A runbook is a YAML file declaring named **tools**. Each tool is an ordered
//! list of shell **steps**, a parameter schema, and the secrets it needs in
//! its environment.
//!
//! ## Invocation contract
//!
//! A tool's parameters are plain data ([`ParameterDescriptor`]). One generic
//! binder ([`ParameterSchema::bind`]) validates every caller-supplied map and
//! applies defaults; [`render_command`] then substitutes the bound values into
//! each step's command.

pub mod core;
pub mod runbook;
pub mod template;

// Re-export commonly used types
pub use core::{
    environment::Environment,
    error::{InvocationError, SecretResolutionError, StepFailure},
};
pub use runbook::{
    entities::{RunbookConfig, SecretRef, StepDefinition, ToolDefinition, to_identifier},
    parameters::{
        BindingError, ParameterDefinition, ParameterDescriptor, ParameterSchema, ParameterValues,
    },
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use template::{RenderError, placeholders, render_command};
