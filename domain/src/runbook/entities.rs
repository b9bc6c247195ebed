//! Runbook domain entities
//!
//! The in-memory form of a parsed runbook file. Everything here is built
//! once at startup and is immutable for the lifetime of the process.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::parameters::ParameterSchema;

/// A parsed runbook: a version tag and the tools it declares
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunbookConfig {
    /// Free-form version string of the runbook format (e.g. "1.0")
    pub version: String,
    /// Declared tools, in file order
    pub tools: Vec<ToolDefinition>,
}

impl RunbookConfig {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            tools: Vec::new(),
        }
    }

    pub fn with_tool(mut self, tool: ToolDefinition) -> Self {
        self.tools.push(tool);
        self
    }

    /// Find a tool by its declared name
    pub fn tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }
}

/// A named, parameterized, multi-step shell operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name, used as the externally invocable tool name
    pub name: String,
    /// Human-readable description surfaced to RPC clients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Steps, executed strictly in this order
    pub steps: Vec<StepDefinition>,
    /// Declared parameters, in declaration order
    #[serde(default, skip_serializing_if = "ParameterSchema::is_empty")]
    pub parameters: ParameterSchema,
    /// Secrets resolved into the environment before any step runs
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub secrets: Vec<SecretRef>,
    /// Default working directory for every step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    /// Per-step time limit in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            steps: Vec::new(),
            parameters: ParameterSchema::default(),
            secrets: Vec::new(),
            cwd: None,
            timeout: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_step(mut self, step: StepDefinition) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_parameters(mut self, parameters: ParameterSchema) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_secret(mut self, secret: SecretRef) -> Self {
        self.secrets.push(secret);
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Identifier form of the tool name (`deploy-app` → `deploy_app`)
    pub fn identifier(&self) -> String {
        to_identifier(&self.name)
    }

    /// Description to publish, empty when none was declared
    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// One shell command within a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Display name used in progress output
    pub name: String,
    /// Command template with `{{ param }}` placeholders
    pub command: String,
    /// Working directory override for this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    /// Environment overrides, applied after secrets
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub env: BTreeMap<String, String>,
}

impl StepDefinition {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            cwd: None,
            env: BTreeMap::new(),
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Maps a secret-store key onto an environment variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    /// Lookup key in the secret store
    pub source: String,
    /// Environment variable the resolved value is written to
    pub target: String,
}

impl SecretRef {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Treat an explicit YAML `~` like an absent key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Map a tool name to its identifier form
pub fn to_identifier(name: &str) -> String {
    name.replace('-', "_")
}
