//! Core domain concepts shared across subdomains.
//!
//! - [`environment::Environment`]: variables handed to a child process
//! - [`error::InvocationError`]: everything that can fail a tool call

pub mod environment;
pub mod error;
