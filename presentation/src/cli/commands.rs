//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for mcp-runbook
#[derive(Parser, Debug)]
#[command(name = "mcp-runbook")]
#[command(author, version, about = "Serve a YAML runbook of shell tools over MCP")]
#[command(long_about = r#"
mcp-runbook turns a YAML runbook into tools an MCP client can call.

Each tool is a sequence of shell steps. Steps run in order with the
caller's parameters substituted into {{ placeholders }}, and the first
failing step stops the tool.

Without --run, --list or --check the runbook is served over stdio.

Settings are loaded from (in priority order):
1. MCP_RUNBOOK_* environment variables
2. --config <path>     Explicit settings file
3. ~/.config/mcp-runbook/config.toml   Global settings

Example:
  mcp-runbook -f runbook.yaml
  mcp-runbook -f runbook.yaml --run sample-tool --args message=hello
  mcp-runbook -f runbook.yaml --check
"#)]
pub struct Cli {
    /// Path to the runbook YAML file
    #[arg(short, long, value_name = "PATH")]
    pub file: PathBuf,

    /// Run a single tool by name instead of serving
    #[arg(long, value_name = "TOOL")]
    pub run: Option<String>,

    /// Arguments for --run in key=value form
    #[arg(long, value_name = "KEY=VALUE", num_args = 0.., requires = "run")]
    pub args: Vec<String>,

    /// List the tools in the runbook and exit
    #[arg(long, conflicts_with_all = ["run", "check"])]
    pub list: bool,

    /// Validate the runbook and exit
    #[arg(long, conflicts_with = "run")]
    pub check: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress step progress in --run mode
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append audit events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub audit_log: Option<PathBuf>,
}

/// What the binary should do with the loaded runbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Serve,
    Run { tool: String, args: Vec<String> },
    List,
    Check,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if let Some(tool) = &self.run {
            Mode::Run {
                tool: tool.clone(),
                args: self.args.clone(),
            }
        } else if self.list {
            Mode::List
        } else if self.check {
            Mode::Check
        } else {
            Mode::Serve
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("mcp-runbook").chain(args.iter().copied()))
    }

    #[test]
    fn test_file_is_required() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_serve_is_default() {
        let cli = parse(&["-f", "runbook.yaml"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("runbook.yaml"));
        assert_eq!(cli.mode(), Mode::Serve);
    }

    #[test]
    fn test_run_with_args() {
        let cli = parse(&[
            "--file",
            "runbook.yaml",
            "--run",
            "sample-tool",
            "--args",
            "message=hi",
            "count=2",
        ])
        .unwrap();

        assert_eq!(
            cli.mode(),
            Mode::Run {
                tool: "sample-tool".to_string(),
                args: vec!["message=hi".to_string(), "count=2".to_string()],
            }
        );
    }

    #[test]
    fn test_args_require_run() {
        assert!(parse(&["-f", "r.yaml", "--args", "a=b"]).is_err());
    }

    #[test]
    fn test_list_conflicts_with_run() {
        assert!(parse(&["-f", "r.yaml", "--list", "--run", "x"]).is_err());
    }

    #[test]
    fn test_verbosity_and_options() {
        let cli = parse(&[
            "-f",
            "r.yaml",
            "-vv",
            "--check",
            "--config",
            "settings.toml",
            "--audit-log",
            "audit.jsonl",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.mode(), Mode::Check);
        assert_eq!(cli.config, Some(PathBuf::from("settings.toml")));
        assert_eq!(cli.audit_log, Some(PathBuf::from("audit.jsonl")));
    }
}
