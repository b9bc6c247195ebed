//! CLI entrypoint for mcp-runbook
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use rmcp::service::ServiceExt;
use rmcp::transport::io::stdio;
use runbook_application::{
    AuditLogger, AuditProgressBridge, CompositeProgress, EnvironmentComposer, InvocationProgress,
    StepExecutor, ToolRegistry, TracingProgress,
};
use runbook_domain::RunbookConfig;
use runbook_infrastructure::{
    JsonlAuditLogger, RunbookLoader, RunbookMcpServer, SettingsLoader, ShellProcessRunner,
    secret_store_from_settings,
};
use runbook_presentation::{Cli, ConsoleFormatter, ConsoleProgress, Mode};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level. Stdout carries the MCP
    // transport, so logs always go to stderr.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings =
        SettingsLoader::load(cli.config.as_deref()).context("Failed to load settings")?;
    let config = RunbookLoader::load(&cli.file)?;

    info!(
        "Loaded runbook {}: version {}, {} tools",
        cli.file.display(),
        config.version,
        config.tools.len()
    );

    let mode = cli.mode();
    match mode {
        Mode::Check => {
            print!("{}", ConsoleFormatter::format_check(&config, &config.validate()));
            return Ok(());
        }
        Mode::List => {
            print!("{}", ConsoleFormatter::format_tool_list(&config));
            return Ok(());
        }
        Mode::Run { .. } | Mode::Serve => {}
    }

    // === Dependency Injection ===
    let store = secret_store_from_settings(&settings);
    let composer =
        Arc::new(EnvironmentComposer::new(store).with_namespace(settings.secret_namespace.clone()));
    let executor = Arc::new(StepExecutor::new(Arc::new(ShellProcessRunner::new())));

    let audit: Option<Arc<dyn AuditLogger>> = cli
        .audit_log
        .as_ref()
        .or(settings.audit_log.as_ref())
        .and_then(JsonlAuditLogger::new)
        .map(|logger| {
            info!("Audit log: {}", logger.path().display());
            Arc::new(logger) as Arc<dyn AuditLogger>
        });

    match mode {
        Mode::Run { tool, args } => {
            let registry = ToolRegistry::from_config(&config, composer, executor);

            let mut progress = CompositeProgress::new(Vec::new());
            if !cli.quiet {
                progress.push(Arc::new(ConsoleProgress));
            }
            if let Some(logger) = audit {
                progress.push(Arc::new(AuditProgressBridge::new(logger)));
            }

            match registry.run_direct(&tool, &args, &progress).await {
                Ok(output) => {
                    println!("{}", output);
                    println!("{}", ConsoleFormatter::format_success(&tool));
                }
                Err(e) => {
                    eprintln!("{}", ConsoleFormatter::format_error(&e));
                    std::process::exit(1);
                }
            }
        }
        _ => serve(&config, &settings.server_name, composer, executor, audit).await?,
    }

    Ok(())
}

/// Register every tool with an MCP server and serve it on stdio until the
/// client disconnects.
async fn serve(
    config: &RunbookConfig,
    server_name: &str,
    composer: Arc<EnvironmentComposer>,
    executor: Arc<StepExecutor>,
    audit: Option<Arc<dyn AuditLogger>>,
) -> Result<()> {
    let mut progress: Vec<Arc<dyn InvocationProgress>> = vec![Arc::new(TracingProgress)];
    if let Some(logger) = audit {
        progress.push(Arc::new(AuditProgressBridge::new(logger)));
    }

    let registry = ToolRegistry::from_config(config, composer, executor)
        .with_handler_progress(Arc::new(CompositeProgress::new(progress)));

    let mut server = RunbookMcpServer::new(server_name).with_instructions(format!(
        "Runbook tools (version {}). Each tool runs a fixed sequence of shell steps.",
        config.version
    ));
    registry.register_all(&mut server);

    info!("Starting MCP server with {} tools", server.len());

    let service = server
        .serve(stdio())
        .await
        .context("Failed to start MCP service")?;
    service.waiting().await?;

    info!("MCP client disconnected");
    Ok(())
}
