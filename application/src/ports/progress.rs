//! Progress notification port
//!
//! Defines the interface for reporting progress while a tool runs.

use super::process_runner::OutputStream;
use runbook_domain::InvocationError;

/// Callback for progress updates during a tool invocation
///
/// Implementations live in the presentation layer (console) or are
/// bridges to logging. Every method has a no-op default.
pub trait InvocationProgress: Send + Sync {
    /// Called once before any secret is resolved
    fn on_tool_start(&self, _tool: &str, _total_steps: usize) {}

    /// Called before a step's process is spawned (`index` is 1-based)
    fn on_step_start(&self, _index: usize, _total: usize, _name: &str) {}

    /// Called for each line of output in streaming mode
    fn on_output_line(&self, _stream: OutputStream, _line: &str) {}

    /// Called after a step's process has exited
    fn on_step_complete(&self, _index: usize, _name: &str, _success: bool) {}

    /// Called once with the final result of the invocation
    fn on_tool_complete(&self, _tool: &str, _result: &Result<String, InvocationError>) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl InvocationProgress for NoProgress {}

/// Reports step boundaries through `tracing`.
///
/// Used in server mode where stdout belongs to the protocol and there is no
/// console to draw on.
pub struct TracingProgress;

impl InvocationProgress for TracingProgress {
    fn on_step_start(&self, index: usize, total: usize, name: &str) {
        tracing::info!("Step [{}/{}] {} is running", index, total, name);
    }

    fn on_output_line(&self, stream: OutputStream, line: &str) {
        tracing::trace!(stream = stream.as_str(), "{}", line);
    }

    fn on_step_complete(&self, index: usize, name: &str, success: bool) {
        if success {
            tracing::debug!("Step {} ({}) completed", index, name);
        } else {
            tracing::warn!("Step {} ({}) failed", index, name);
        }
    }
}
