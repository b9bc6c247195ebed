//! Tool registry.
//!
//! Owns one [`ToolInvoker`] per configured tool, hands them to an RPC
//! transport through [`ToolRegistrar`], and provides the direct invocation
//! path used by the CLI. The registry is built once at startup and never
//! changes afterwards.

use crate::ports::process_runner::OutputMode;
use crate::ports::progress::{InvocationProgress, NoProgress};
use crate::ports::tool_registrar::{ToolRegistrar, ToolRegistration};
use crate::use_cases::compose_environment::EnvironmentComposer;
use crate::use_cases::execute_step::StepExecutor;
use crate::use_cases::invoke_tool::ToolInvoker;
use runbook_domain::{InvocationError, ParameterValues, RunbookConfig, to_identifier};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of parsing `key=value` arguments
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedArgs {
    pub values: ParameterValues,
    /// Entries that were not of the form `key=value`
    pub malformed: Vec<String>,
}

/// Parse CLI-style `key=value` arguments.
///
/// The value may itself contain `=`; only the first one splits. Entries
/// without `=` or with an empty key are collected in
/// [`ParsedArgs::malformed`] and otherwise ignored. Later duplicates win.
pub fn parse_key_value_args(args: &[String]) -> ParsedArgs {
    let mut parsed = ParsedArgs::default();
    for arg in args {
        match arg.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                parsed.values.insert(key.to_string(), value.to_string());
            }
            _ => parsed.malformed.push(arg.clone()),
        }
    }
    parsed
}

/// Explicit registry of invocable tools.
pub struct ToolRegistry {
    invokers: Vec<ToolInvoker>,
    /// Declared name and identifier form, both mapped to an index in `invokers`
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build one invoker per tool in `config`.
    ///
    /// If two tools share a name, the first one wins.
    pub fn from_config(
        config: &RunbookConfig,
        composer: Arc<EnvironmentComposer>,
        executor: Arc<StepExecutor>,
    ) -> Self {
        let progress: Arc<dyn InvocationProgress> = Arc::new(NoProgress);
        let mut invokers = Vec::with_capacity(config.tools.len());
        let mut index = HashMap::new();

        for tool in &config.tools {
            if index.contains_key(&tool.name) {
                warn!("Ignoring duplicate tool definition: {}", tool.name);
                continue;
            }
            let position = invokers.len();
            index.insert(tool.name.clone(), position);
            index.entry(tool.identifier()).or_insert(position);

            invokers.push(ToolInvoker::new(
                Arc::new(tool.clone()),
                composer.clone(),
                executor.clone(),
                progress.clone(),
            ));
        }

        Self { invokers, index }
    }

    /// Progress used by handlers registered through [`Self::register_all`]
    pub fn with_handler_progress(mut self, progress: Arc<dyn InvocationProgress>) -> Self {
        self.invokers = self
            .invokers
            .into_iter()
            .map(|inv| inv.with_progress(progress.clone()))
            .collect();
        self
    }

    pub fn len(&self) -> usize {
        self.invokers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invokers.is_empty()
    }

    /// Look a tool up by declared name or by identifier form
    pub fn get(&self, name: &str) -> Result<&ToolInvoker, InvocationError> {
        self.index
            .get(name)
            .or_else(|| self.index.get(&to_identifier(name)))
            .map(|&i| &self.invokers[i])
            .ok_or_else(|| InvocationError::UnknownTool(name.to_string()))
    }

    /// Hand every tool to `registrar`. Called once at startup.
    pub fn register_all(&self, registrar: &mut dyn ToolRegistrar) {
        for invoker in &self.invokers {
            let tool = invoker.tool();
            registrar.register(ToolRegistration {
                name: tool.name.clone(),
                description: tool.description_or_default().to_string(),
                parameters: tool.parameters.descriptors(),
                handler: Arc::new(invoker.clone()),
            });
            info!(
                "Registered tool: {} with description: {}",
                tool.name,
                tool.description_or_default()
            );
        }
    }

    /// Run `name` directly with `key=value` arguments in streaming mode.
    ///
    /// Malformed arguments are reported and skipped.
    pub async fn run_direct(
        &self,
        name: &str,
        args: &[String],
        progress: &dyn InvocationProgress,
    ) -> Result<String, InvocationError> {
        let invoker = self.get(name)?;

        let parsed = parse_key_value_args(args);
        for arg in &parsed.malformed {
            warn!("Ignoring invalid argument: {}. Use key=value format", arg);
        }

        info!("Starting CLI execution of tool: {}", invoker.tool().name);
        invoker
            .invoke(parsed.values, OutputMode::Streaming, progress)
            .await
    }
}
