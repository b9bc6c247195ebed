//! Composite progress notifier: delegates to multiple notifiers.
//!
//! Used to fan out invocation events to the console (or tracing) and the
//! audit log at the same time.

use super::process_runner::OutputStream;
use super::progress::InvocationProgress;
use runbook_domain::InvocationError;
use std::sync::Arc;

/// A progress notifier that delegates to multiple inner notifiers.
///
/// Delegates are shared so that a composite can be handed to the registry
/// as a long-lived handler progress as well as used for a single run.
///
/// ```text
/// ToolRegistry::run_direct(name, args, &composite)
///                                        |
///               +------------------------+------------------------+
///               |                                                 |
///        ConsoleProgress                                 AuditProgressBridge
///        → stdout                                        → AuditLogger (JSONL)
/// ```
pub struct CompositeProgress {
    delegates: Vec<Arc<dyn InvocationProgress>>,
}

impl CompositeProgress {
    pub fn new(delegates: Vec<Arc<dyn InvocationProgress>>) -> Self {
        Self { delegates }
    }

    pub fn push(&mut self, delegate: Arc<dyn InvocationProgress>) {
        self.delegates.push(delegate);
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

/// Macro to delegate a method call to all inner notifiers.
macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        for d in &$self.delegates {
            d.$method($($arg),*);
        }
    };
}

impl InvocationProgress for CompositeProgress {
    fn on_tool_start(&self, tool: &str, total_steps: usize) {
        delegate!(self, on_tool_start, tool, total_steps);
    }

    fn on_step_start(&self, index: usize, total: usize, name: &str) {
        delegate!(self, on_step_start, index, total, name);
    }

    fn on_output_line(&self, stream: OutputStream, line: &str) {
        delegate!(self, on_output_line, stream, line);
    }

    fn on_step_complete(&self, index: usize, name: &str, success: bool) {
        delegate!(self, on_step_complete, index, name, success);
    }

    fn on_tool_complete(&self, tool: &str, result: &Result<String, InvocationError>) {
        delegate!(self, on_tool_complete, tool, result);
    }
}
