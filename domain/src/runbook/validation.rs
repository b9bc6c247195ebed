//! Structural validation of a parsed runbook.
//!
//! Deserialization already guarantees the shape (every step has a command,
//! `steps` is a list). This pass catches what the shape cannot express:
//! duplicate names, names that collide once mapped to identifiers, commands
//! that can never render, and similar.
//!
//! # Examples
//!
//! ```
//! use runbook_domain::{RunbookConfig, StepDefinition, ToolDefinition};
//! use runbook_domain::runbook::validation::Severity;
//!
//! let config = RunbookConfig::new("1.0")
//!     .with_tool(ToolDefinition::new("hello").with_step(StepDefinition::new("Greet", "echo hi")));
//! let issues = config.validate();
//! assert!(issues.iter().all(|i| i.severity != Severity::Error));
//! ```

use super::entities::{RunbookConfig, ToolDefinition};
use crate::template::placeholders;
use std::collections::HashMap;
use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the runbook cannot be served.
    Error,
    /// Non-fatal: the runbook loads but a tool may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// The runbook declares no tools at all.
    NoTools,
    /// Two tools share a name.
    DuplicateToolName,
    /// Two distinct names map to the same identifier (`a-b` and `a_b`).
    IdentifierCollision,
    /// Tool name is empty or contains characters outside `[A-Za-z0-9_-]`.
    InvalidToolName,
    /// A tool has no steps; invoking it does nothing.
    NoSteps,
    /// A step's command is empty or whitespace.
    EmptyCommand,
    /// A step's command contains an unparseable `{{ ... }}`.
    MalformedTemplate,
    /// A step references a parameter the tool does not declare.
    UndeclaredPlaceholder,
    /// `timeout: 0` would fail every step immediately.
    ZeroTimeout,
    /// A secret target is not a usable environment variable name.
    InvalidSecretTarget,
}

/// A detected issue in the runbook.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    /// Tool the issue belongs to, if any
    pub tool: Option<String>,
    pub message: String,
}

impl ConfigIssue {
    fn error(code: ConfigIssueCode, tool: Option<&str>, message: String) -> Self {
        Self {
            severity: Severity::Error,
            code,
            tool: tool.map(str::to_string),
            message,
        }
    }

    fn warning(code: ConfigIssueCode, tool: Option<&str>, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            tool: tool.map(str::to_string),
            message,
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tool {
            Some(tool) => write!(f, "tool '{}': {}", tool, self.message),
            None => f.write_str(&self.message),
        }
    }
}

fn is_valid_tool_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_valid_env_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('=') && !name.contains('\0')
}

impl RunbookConfig {
    /// Check the runbook and return every issue found.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.tools.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoTools,
                None,
                "runbook declares no tools".to_string(),
            ));
        }

        let mut names: HashMap<&str, usize> = HashMap::new();
        let mut identifiers: HashMap<String, &str> = HashMap::new();
        for tool in &self.tools {
            let seen = names.entry(tool.name.as_str()).or_insert(0);
            *seen += 1;
            if *seen == 2 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateToolName,
                    Some(&tool.name),
                    "declared more than once".to_string(),
                ));
            }

            if let Some(other) = identifiers.get(&tool.identifier())
                && *other != tool.name
            {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::IdentifierCollision,
                    Some(&tool.name),
                    format!("identifier '{}' is also used by '{}'", tool.identifier(), other),
                ));
            } else {
                identifiers.insert(tool.identifier(), tool.name.as_str());
            }

            validate_tool(tool, &mut issues);
        }

        issues
    }

    /// Whether any issue is fatal
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}

fn validate_tool(tool: &ToolDefinition, issues: &mut Vec<ConfigIssue>) {
    let name = Some(tool.name.as_str());

    if !is_valid_tool_name(&tool.name) {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::InvalidToolName,
            name,
            "name must be non-empty and use only letters, digits, '_' and '-'".to_string(),
        ));
    }

    if tool.steps.is_empty() {
        issues.push(ConfigIssue::warning(
            ConfigIssueCode::NoSteps,
            name,
            "no steps declared".to_string(),
        ));
    }

    if tool.timeout == Some(0) {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::ZeroTimeout,
            name,
            "timeout must be at least 1 second".to_string(),
        ));
    }

    for secret in &tool.secrets {
        if !is_valid_env_name(&secret.target) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidSecretTarget,
                name,
                format!(
                    "secret '{}' has an invalid target '{}'",
                    secret.source, secret.target
                ),
            ));
        }
    }

    for (i, step) in tool.steps.iter().enumerate() {
        if step.command.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyCommand,
                name,
                format!("step {} ('{}') has an empty command", i + 1, step.name),
            ));
            continue;
        }

        match placeholders(&step.command) {
            Ok(referenced) => {
                for param in referenced {
                    if tool.parameters.get(param).is_none() {
                        issues.push(ConfigIssue::warning(
                            ConfigIssueCode::UndeclaredPlaceholder,
                            name,
                            format!(
                                "step {} ('{}') references undeclared parameter '{}'",
                                i + 1,
                                step.name,
                                param
                            ),
                        ));
                    }
                }
            }
            Err(e) => issues.push(ConfigIssue::error(
                ConfigIssueCode::MalformedTemplate,
                name,
                format!("step {} ('{}'): {}", i + 1, step.name, e),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runbook::entities::{SecretRef, StepDefinition};
    use crate::runbook::parameters::{ParameterDefinition, ParameterSchema};

    // ==================== Helper ====================

    fn tool(name: &str) -> ToolDefinition {
        ToolDefinition::new(name).with_step(StepDefinition::new("Run", "echo ok"))
    }

    fn codes(config: &RunbookConfig) -> Vec<ConfigIssueCode> {
        config.validate().iter().map(|i| i.code).collect()
    }

    // ==================== Valid runbooks ====================

    #[test]
    fn sample_tool_is_valid() {
        let config = RunbookConfig::new("1.0").with_tool(
            ToolDefinition::new("sample-tool")
                .with_step(StepDefinition::new("Greeting", "echo Hello {{name}}"))
                .with_step(StepDefinition::new("List Project", "ls"))
                .with_parameters(ParameterSchema::new().with(
                    ParameterDefinition::new("name", "who to greet").with_default("World"),
                )),
        );
        assert!(config.validate().is_empty());
    }

    // ==================== Warnings ====================

    #[test]
    fn empty_runbook_warns() {
        let config = RunbookConfig::new("1.0");
        assert_eq!(codes(&config), vec![ConfigIssueCode::NoTools]);
        assert!(!RunbookConfig::has_errors(&config.validate()));
    }

    #[test]
    fn tool_without_steps_warns() {
        let config = RunbookConfig::new("1.0").with_tool(ToolDefinition::new("noop"));
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].code, ConfigIssueCode::NoSteps);
    }

    #[test]
    fn undeclared_placeholder_warns() {
        let config = RunbookConfig::new("1.0").with_tool(
            ToolDefinition::new("greet").with_step(StepDefinition::new("Say", "echo {{ who }}")),
        );
        let issues = config.validate();
        assert_eq!(issues[0].code, ConfigIssueCode::UndeclaredPlaceholder);
        assert!(issues[0].to_string().contains("'who'"));
    }

    // ==================== Errors ====================

    #[test]
    fn duplicate_name_is_error() {
        let config = RunbookConfig::new("1.0")
            .with_tool(tool("deploy"))
            .with_tool(tool("deploy"));
        assert_eq!(codes(&config), vec![ConfigIssueCode::DuplicateToolName]);
    }

    #[test]
    fn identifier_collision_is_error() {
        let config = RunbookConfig::new("1.0")
            .with_tool(tool("deploy-app"))
            .with_tool(tool("deploy_app"));
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::IdentifierCollision);
        assert_eq!(issues[0].tool.as_deref(), Some("deploy_app"));
    }

    #[test]
    fn invalid_name_is_error() {
        let config = RunbookConfig::new("1.0").with_tool(tool("deploy app"));
        assert_eq!(codes(&config), vec![ConfigIssueCode::InvalidToolName]);
    }

    #[test]
    fn empty_command_is_error() {
        let config = RunbookConfig::new("1.0")
            .with_tool(ToolDefinition::new("blank").with_step(StepDefinition::new("Nothing", "  ")));
        assert_eq!(codes(&config), vec![ConfigIssueCode::EmptyCommand]);
    }

    #[test]
    fn malformed_template_is_error() {
        let config = RunbookConfig::new("1.0").with_tool(
            ToolDefinition::new("broken").with_step(StepDefinition::new("Bad", "echo {{ oops")),
        );
        assert!(RunbookConfig::has_errors(&config.validate()));
        assert_eq!(codes(&config), vec![ConfigIssueCode::MalformedTemplate]);
    }

    #[test]
    fn zero_timeout_and_bad_secret_target_are_errors() {
        let config = RunbookConfig::new("1.0").with_tool(
            tool("slow")
                .with_timeout(0)
                .with_secret(SecretRef::new("token", "")),
        );
        let found = codes(&config);
        assert!(found.contains(&ConfigIssueCode::ZeroTimeout));
        assert!(found.contains(&ConfigIssueCode::InvalidSecretTarget));
    }
}
