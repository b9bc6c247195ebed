//! Tool invocation.
//!
//! One [`ToolInvoker`] exists per configured tool. It binds caller
//! parameters against the tool's schema, composes the environment once, and
//! drives the steps in declared order, stopping at the first failure.

use crate::ports::audit_logger::output_preview;
use crate::ports::process_runner::OutputMode;
use crate::ports::progress::InvocationProgress;
use crate::ports::tool_registrar::ToolHandler;
use crate::use_cases::compose_environment::EnvironmentComposer;
use crate::use_cases::execute_step::{StepExecutor, StepInput};
use async_trait::async_trait;
use runbook_domain::{InvocationError, ParameterValues, ToolDefinition};
use std::sync::Arc;
use tracing::{info, warn};

/// Invocable form of a single tool.
///
/// Holds only shared, immutable state, so concurrent calls on the same
/// invoker are independent of each other.
#[derive(Clone)]
pub struct ToolInvoker {
    tool: Arc<ToolDefinition>,
    composer: Arc<EnvironmentComposer>,
    executor: Arc<StepExecutor>,
    /// Progress used when called through [`ToolHandler`]
    progress: Arc<dyn InvocationProgress>,
}

impl ToolInvoker {
    pub fn new(
        tool: Arc<ToolDefinition>,
        composer: Arc<EnvironmentComposer>,
        executor: Arc<StepExecutor>,
        progress: Arc<dyn InvocationProgress>,
    ) -> Self {
        Self {
            tool,
            composer,
            executor,
            progress,
        }
    }

    /// Replace the progress used when called through [`ToolHandler`]
    pub fn with_progress(mut self, progress: Arc<dyn InvocationProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn tool(&self) -> &ToolDefinition {
        &self.tool
    }

    /// Run the tool end to end.
    ///
    /// Parameter binding and secret resolution both happen before the first
    /// process is spawned. The result is the newline join of every
    /// non-empty step output.
    pub async fn invoke(
        &self,
        parameters: ParameterValues,
        mode: OutputMode,
        progress: &dyn InvocationProgress,
    ) -> Result<String, InvocationError> {
        let tool = self.tool.as_ref();
        info!("Starting tool {} with parameters: {:?}", tool.name, parameters);
        progress.on_tool_start(&tool.name, tool.steps.len());

        let result = self.run_steps(parameters, mode, progress).await;

        match &result {
            Ok(output) => info!(
                "Completed tool {}. Output: {}",
                tool.name,
                output_preview(output)
            ),
            Err(e) => warn!("Tool {} failed: {}", tool.name, e),
        }
        progress.on_tool_complete(&tool.name, &result);

        result
    }

    async fn run_steps(
        &self,
        parameters: ParameterValues,
        mode: OutputMode,
        progress: &dyn InvocationProgress,
    ) -> Result<String, InvocationError> {
        let tool = self.tool.as_ref();
        let parameters = tool.parameters.bind(parameters)?;
        let base_env = self.composer.compose(tool).await?;

        let total = tool.steps.len();
        let mut outputs: Vec<String> = Vec::with_capacity(total);

        for (i, step) in tool.steps.iter().enumerate() {
            let output = self
                .executor
                .execute(
                    StepInput {
                        tool,
                        step,
                        index: i + 1,
                        total,
                        base_env: &base_env,
                        parameters: &parameters,
                        mode,
                    },
                    progress,
                )
                .await?;

            if !output.is_empty() {
                outputs.push(output);
            }
        }

        Ok(outputs.join("\n"))
    }
}

#[async_trait]
impl ToolHandler for ToolInvoker {
    async fn call(&self, parameters: ParameterValues) -> Result<String, InvocationError> {
        self.invoke(parameters, OutputMode::Buffered, self.progress.as_ref())
            .await
    }
}
