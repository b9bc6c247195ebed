//! Step execution.
//!
//! Runs one step of a tool: applies step environment overrides, resolves the
//! working directory, renders the command, hands it to the
//! [`ProcessRunner`] and maps the exit status to a step result.

use crate::ports::process_runner::{OutputMode, ProcessError, ProcessRequest, ProcessRunner};
use crate::ports::progress::InvocationProgress;
use runbook_domain::{
    Environment, InvocationError, ParameterValues, StepDefinition, StepFailure, ToolDefinition,
    render_command,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Input for [`StepExecutor::execute`].
#[derive(Debug, Clone, Copy)]
pub struct StepInput<'a> {
    pub tool: &'a ToolDefinition,
    pub step: &'a StepDefinition,
    /// 1-based position of `step` within the tool
    pub index: usize,
    pub total: usize,
    /// Inherited environment plus resolved secrets
    pub base_env: &'a Environment,
    /// Bound parameters
    pub parameters: &'a ParameterValues,
    pub mode: OutputMode,
}

/// Executes a single step through a [`ProcessRunner`].
pub struct StepExecutor {
    runner: Arc<dyn ProcessRunner>,
}

impl StepExecutor {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Working directory: step override, then tool default, then inherited
    fn working_dir(tool: &ToolDefinition, step: &StepDefinition) -> Option<PathBuf> {
        step.cwd.clone().or_else(|| tool.cwd.clone())
    }

    /// Run one step and return its captured stdout.
    ///
    /// Render failures surface before `on_step_start`, so a step that can
    /// never run is not reported as started.
    pub async fn execute(
        &self,
        input: StepInput<'_>,
        progress: &dyn InvocationProgress,
    ) -> Result<String, InvocationError> {
        let StepInput {
            tool,
            step,
            index,
            total,
            base_env,
            parameters,
            mode,
        } = input;

        let env = base_env
            .clone()
            .overlay(step.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let cwd = Self::working_dir(tool, step);

        let command =
            render_command(&step.command, parameters).map_err(|error| InvocationError::Render {
                index,
                step: step.name.clone(),
                error,
            })?;

        progress.on_step_start(index, total, &step.name);
        debug!("Step {} command: {}", index, command);

        let request = ProcessRequest::new(command, env)
            .with_cwd(cwd)
            .with_mode(mode)
            .with_timeout(tool.timeout.map(Duration::from_secs));

        let outcome = match self.runner.run(request, progress).await {
            Ok(outcome) => outcome,
            Err(e) => {
                progress.on_step_complete(index, &step.name, false);
                let step = step.name.clone();
                return Err(match e {
                    ProcessError::TimedOut(limit) => InvocationError::Timeout {
                        index,
                        step,
                        seconds: limit.as_secs(),
                    },
                    ProcessError::Spawn(message) => InvocationError::Spawn {
                        index,
                        step,
                        message,
                    },
                    ProcessError::Io(message) => InvocationError::Io {
                        index,
                        step,
                        message,
                    },
                });
            }
        };

        let success = outcome.success();
        progress.on_step_complete(index, &step.name, success);

        if !success {
            return Err(StepFailure::from_exit(index, &outcome.stderr, outcome.exit_code).into());
        }

        Ok(outcome.stdout)
    }
}
