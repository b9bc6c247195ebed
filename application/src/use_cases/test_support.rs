//! Fakes shared by use case tests

use crate::ports::process_runner::{ProcessError, ProcessOutcome, ProcessRequest, ProcessRunner};
use crate::ports::progress::InvocationProgress;
use async_trait::async_trait;
use std::sync::Mutex;

/// Interprets a tiny command language instead of spawning processes.
///
/// - `echo <text>` succeeds with `<text>` on stdout
/// - `exit <n>` exits with code `n` and no output
/// - `fail <text>` exits with code 1 and `<text>` on stderr
/// - anything else succeeds silently
#[derive(Default)]
pub struct ScriptedRunner {
    requests: Mutex<Vec<ProcessRequest>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.command.clone())
            .collect()
    }

    pub fn requests(&self) -> Vec<ProcessRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(
        &self,
        request: ProcessRequest,
        _progress: &dyn InvocationProgress,
    ) -> Result<ProcessOutcome, ProcessError> {
        let command = request.command.clone();
        self.requests.lock().unwrap().push(request);

        let outcome = |code: i32, stdout: &str, stderr: &str| ProcessOutcome {
            exit_code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        };

        Ok(if let Some(text) = command.strip_prefix("echo ") {
            outcome(0, text, "")
        } else if let Some(code) = command.strip_prefix("exit ") {
            outcome(code.trim().parse().unwrap_or(1), "", "")
        } else if let Some(text) = command.strip_prefix("fail ") {
            outcome(1, "", text)
        } else {
            outcome(0, "", "")
        })
    }
}
