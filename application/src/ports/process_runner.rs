//! Process runner port
//!
//! Defines how a rendered step command is executed. The shell-backed
//! implementation lives in the infrastructure layer.

use super::progress::InvocationProgress;
use async_trait::async_trait;
use runbook_domain::Environment;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// How a step's output is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Read everything after the process exits (server calls)
    #[default]
    Buffered,
    /// Surface each line as it is produced (direct CLI runs)
    Streaming,
}

/// Which pipe a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputStream::Stdout => "stdout",
            OutputStream::Stderr => "stderr",
        }
    }
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single command to run through the shell
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub command: String,
    /// Working directory; `None` inherits the caller's
    pub cwd: Option<PathBuf>,
    /// Complete environment of the child; nothing else is inherited
    pub env: Environment,
    pub mode: OutputMode,
    pub timeout: Option<Duration>,
}

impl ProcessRequest {
    pub fn new(command: impl Into<String>, env: Environment) -> Self {
        Self {
            command: command.into(),
            cwd: None,
            env,
            mode: OutputMode::default(),
            timeout: None,
        }
    }

    pub fn with_cwd(mut self, cwd: Option<PathBuf>) -> Self {
        self.cwd = cwd;
        self
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// Captured stdout with trailing whitespace removed
    pub stdout: String,
    /// Captured stderr with trailing whitespace removed
    pub stderr: String,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("{0}")]
    Spawn(String),

    #[error("timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("I/O error while reading process output: {0}")]
    Io(String),
}

/// Port for running one shell command to completion
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `request`, reporting streamed lines to `progress`.
    ///
    /// A nonzero exit is not an error here; it is reported through
    /// [`ProcessOutcome::exit_code`].
    async fn run(
        &self,
        request: ProcessRequest,
        progress: &dyn InvocationProgress,
    ) -> Result<ProcessOutcome, ProcessError>;
}
