//! Presentation layer for mcp-runbook
//!
//! This crate contains the CLI definition, console progress for direct
//! runs, and console output formatting.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Mode};
pub use output::console::ConsoleFormatter;
pub use progress::console::ConsoleProgress;
