//! Use cases
//!
//! Application-level operations that drive the tool execution engine.

pub mod compose_environment;
pub mod execute_step;
pub mod invoke_tool;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;
