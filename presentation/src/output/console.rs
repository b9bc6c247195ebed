//! Console output for the one-shot CLI modes

use colored::Colorize;
use runbook_domain::{ConfigIssue, InvocationError, RunbookConfig, Severity};

/// Formats runbook summaries and tool results for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One line per tool plus an indented line per parameter
    pub fn format_tool_list(config: &RunbookConfig) -> String {
        let mut output = Self::summary(config);
        output.push('\n');

        for tool in &config.tools {
            output.push_str(&format!(
                "\n{} - {}\n",
                tool.name.bold(),
                tool.description_or_default()
            ));
            output.push_str(&format!(
                "  {} step(s){}\n",
                tool.steps.len(),
                tool.timeout
                    .map(|t| format!(", timeout {}s", t))
                    .unwrap_or_default()
            ));

            for param in tool.parameters.descriptors() {
                let qualifier = match (&param.default, param.required) {
                    (Some(default), _) => format!("default: {}", default),
                    (None, true) => "required".to_string(),
                    (None, false) => "optional".to_string(),
                };
                output.push_str(&format!(
                    "    {} ({}) {}\n",
                    param.name.cyan(),
                    qualifier.dimmed(),
                    param.description
                ));
            }
        }

        output
    }

    /// Result of `--check`: the summary line followed by any warnings
    pub fn format_check(config: &RunbookConfig, issues: &[ConfigIssue]) -> String {
        let mut output = format!(
            "{} {}\n",
            "v".green(),
            format!("Successfully parsed config: {}", Self::summary(config)).green()
        );

        for issue in issues {
            let label = match issue.severity {
                Severity::Error => "error:".red().bold(),
                Severity::Warning => "warning:".yellow().bold(),
            };
            output.push_str(&format!("  {} {}\n", label, issue));
        }

        output
    }

    pub fn format_success(tool: &str) -> String {
        format!(
            "{} {}",
            "v".green(),
            format!("Successfully executed tool '{}'", tool).green()
        )
    }

    pub fn format_error(error: &InvocationError) -> String {
        format!("{} {}", "x".red(), format!("Error running tool: {}", error).red())
    }

    fn summary(config: &RunbookConfig) -> String {
        format!("Version {}, {} tools", config.version, config.tools.len())
    }
}
