//! Invocation error types

use crate::runbook::parameters::BindingError;
use crate::template::RenderError;
use thiserror::Error;

/// A declared secret could not be resolved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretResolutionError {
    #[error("Secret '{key}' not found in secret store")]
    Missing { key: String },

    #[error("Secret store lookup for '{key}' failed: {message}")]
    Backend { key: String, message: String },
}

/// A step's process exited unsuccessfully
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Step {index} failed: {message}")]
pub struct StepFailure {
    /// 1-based step position
    pub index: usize,
    pub message: String,
}

impl StepFailure {
    pub fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Build a failure from captured stderr, falling back to the exit status
    pub fn from_exit(index: usize, stderr: &str, exit_code: Option<i32>) -> Self {
        let stderr = stderr.trim();
        let message = if !stderr.is_empty() {
            stderr.to_string()
        } else {
            match exit_code {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            }
        };
        Self { index, message }
    }
}

/// Everything that can make a tool invocation fail
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid parameters: {0}")]
    ParameterBinding(#[from] BindingError),

    #[error(transparent)]
    SecretResolution(#[from] SecretResolutionError),

    #[error("Failed to render command for step {index} '{step}': {error}")]
    Render {
        index: usize,
        step: String,
        #[source]
        error: RenderError,
    },

    #[error(transparent)]
    StepFailed(#[from] StepFailure),

    /// The process could not be started
    #[error("Failed to spawn step {index} '{step}': {message}")]
    Spawn {
        index: usize,
        step: String,
        message: String,
    },

    /// The process started but its output could not be collected
    #[error("Failed to read output of step {index} '{step}': {message}")]
    Io {
        index: usize,
        step: String,
        message: String,
    },

    #[error("Step {index} '{step}' timed out after {seconds}s")]
    Timeout {
        index: usize,
        step: String,
        seconds: u64,
    },
}

impl InvocationError {
    /// 1-based index of the step that failed, for step-level failures
    pub fn step_index(&self) -> Option<usize> {
        match self {
            Self::Render { index, .. }
            | Self::Spawn { index, .. }
            | Self::Io { index, .. }
            | Self::Timeout { index, .. } => Some(*index),
            Self::StepFailed(failure) => Some(failure.index),
            Self::UnknownTool(_) | Self::ParameterBinding(_) | Self::SecretResolution(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_failure_prefers_stderr() {
        let failure = StepFailure::from_exit(2, "  permission denied\n", Some(1));
        assert_eq!(failure.message, "permission denied");
        assert_eq!(failure.to_string(), "Step 2 failed: permission denied");
    }

    #[test]
    fn test_step_failure_falls_back_to_exit_code() {
        let failure = StepFailure::from_exit(1, "", Some(3));
        assert_eq!(failure.message, "exit code 3");
        assert!(failure.to_string().contains('3'));
    }

    #[test]
    fn test_step_failure_without_code() {
        let failure = StepFailure::from_exit(1, "\n", None);
        assert_eq!(failure.message, "terminated by signal");
    }

    #[test]
    fn test_invocation_error_display() {
        let err = InvocationError::from(SecretResolutionError::Missing {
            key: "api_token".into(),
        });
        assert_eq!(err.to_string(), "Secret 'api_token' not found in secret store");
        assert_eq!(err.step_index(), None);

        let err = InvocationError::Timeout {
            index: 2,
            step: "Build".into(),
            seconds: 5,
        };
        assert_eq!(err.to_string(), "Step 2 'Build' timed out after 5s");
        assert_eq!(err.step_index(), Some(2));
    }

    #[test]
    fn test_io_failure_is_not_a_spawn_failure() {
        let err = InvocationError::Io {
            index: 1,
            step: "Tail".into(),
            message: "broken pipe".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read output of step 1 'Tail': broken pipe"
        );
        assert_eq!(err.step_index(), Some(1));
        assert_eq!(
            InvocationError::from(StepFailure::new(3, "boom")).step_index(),
            Some(3)
        );
    }

    #[test]
    fn test_binding_error_converts() {
        let err: InvocationError = BindingError::MissingParameters(vec!["target".into()]).into();
        assert_eq!(
            err.to_string(),
            "Invalid parameters: missing required parameter(s): target"
        );
    }
}
