//! Port for structured audit logging.
//!
//! Defines the [`AuditLogger`] trait for recording invocation events (tool
//! start, step boundaries, results) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures a
//! machine-readable record of what ran (JSONL). Secret values and step
//! output lines are never recorded.

use super::progress::InvocationProgress;
use runbook_domain::InvocationError;
use serde_json::{Value, json};
use std::sync::Arc;

/// Maximum characters of tool output kept in a completion event
pub const OUTPUT_PREVIEW_CHARS: usize = 100;

/// A structured audit event.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The logger adds the timestamp.
pub struct AuditEvent {
    /// Event type identifier (e.g., "tool_start", "step_complete").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging audit events.
///
/// The `log` method is synchronous and non-fallible so that a broken log
/// file never fails a tool invocation.
pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLogger;

impl AuditLogger for NoAuditLogger {
    fn log(&self, _event: AuditEvent) {}
}

/// First [`OUTPUT_PREVIEW_CHARS`] characters of `output`, with an ellipsis
/// when truncated
pub fn output_preview(output: &str) -> String {
    let mut chars = output.chars();
    let head: String = chars.by_ref().take(OUTPUT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Bridge that records progress callbacks as audit events.
///
/// | InvocationProgress callback | event_type |
/// |-----------------------------|------------|
/// | `on_tool_start` | `tool_start` { tool, total_steps } |
/// | `on_step_start` | `step_start` { index, total, step } |
/// | `on_step_complete` | `step_complete` { index, step, success } |
/// | `on_tool_complete` | `tool_complete` { tool, success, output_preview \| error, failed_step } |
pub struct AuditProgressBridge {
    logger: Arc<dyn AuditLogger>,
}

impl AuditProgressBridge {
    pub fn new(logger: Arc<dyn AuditLogger>) -> Self {
        Self { logger }
    }
}

impl InvocationProgress for AuditProgressBridge {
    fn on_tool_start(&self, tool: &str, total_steps: usize) {
        self.logger.log(AuditEvent::new(
            "tool_start",
            json!({ "tool": tool, "total_steps": total_steps }),
        ));
    }

    fn on_step_start(&self, index: usize, total: usize, name: &str) {
        self.logger.log(AuditEvent::new(
            "step_start",
            json!({ "index": index, "total": total, "step": name }),
        ));
    }

    fn on_step_complete(&self, index: usize, name: &str, success: bool) {
        self.logger.log(AuditEvent::new(
            "step_complete",
            json!({ "index": index, "step": name, "success": success }),
        ));
    }

    fn on_tool_complete(&self, tool: &str, result: &Result<String, InvocationError>) {
        let payload = match result {
            Ok(output) => json!({
                "tool": tool,
                "success": true,
                "output_preview": output_preview(output),
            }),
            Err(e) => json!({
                "tool": tool,
                "success": false,
                "error": e.to_string(),
                "failed_step": e.step_index(),
            }),
        };
        self.logger.log(AuditEvent::new("tool_complete", payload));
    }
}
