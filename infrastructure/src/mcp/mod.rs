//! MCP transport adapter
//!
//! [`RunbookMcpServer`] receives tool registrations through the
//! `ToolRegistrar` port and serves them with `rmcp`.

mod schema;
mod server;

pub use schema::input_schema;
pub use server::RunbookMcpServer;
