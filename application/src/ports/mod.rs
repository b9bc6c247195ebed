//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod audit_logger;
pub mod composite_progress;
pub mod process_runner;
pub mod progress;
pub mod secret_store;
pub mod tool_registrar;
