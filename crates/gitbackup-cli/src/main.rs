//! gitbackup CLI
//!
//! Exports Overleaf projects and project lists into per-identity git
//! histories. Each failure class exits with its own status code.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{CliError, Result};

/// Crates whose events are shown by default
const LOG_TARGETS: &[&str] = &[
    "gitbackup",
    "gitbackup_core",
    "gitbackup_fs",
    "gitbackup_git",
    "gitbackup_remote",
    "gitbackup_store",
];

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    if let Err(e) = run(cli).await {
        report_error(&e, json);
        std::process::exit(e.exit_code());
    }
}

/// Log to stderr; stdout carries command output.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        let directives: Vec<String> = LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect();
        EnvFilter::new(format!("warn,{}", directives.join(",")))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let overrides = commands::Overrides::from_cli(&cli);
    let json = cli.json;

    match cli.command {
        Commands::Project {
            identity,
            project_id,
            container,
            overleaf_path,
            timeout,
        } => {
            let overrides = overrides.with_export(container, overleaf_path, timeout);
            let config = commands::load_config(cli.config.as_deref(), &overrides)?;
            commands::run_project(config, &identity, &project_id, json).await
        }
        Commands::Projects { identity } => {
            let config = commands::load_config(cli.config.as_deref(), &overrides)?;
            commands::run_projects(config, &identity, json).await
        }
        Commands::History {
            identity,
            project_id,
            limit,
        } => {
            let config = commands::load_config(cli.config.as_deref(), &overrides)?;
            commands::run_history(&config, &identity, project_id.as_deref(), limit, json)
        }
    }
}

fn report_error(e: &CliError, json: bool) {
    if json {
        match serde_json::to_string_pretty(&e.report()) {
            Ok(body) => println!("{body}"),
            Err(_) => eprintln!("{}: {}", "error".red().bold(), e),
        }
        return;
    }

    eprintln!("{}: {}", "error".red().bold(), e);
    if let CliError::Core(core) = e {
        let mut source = std::error::Error::source(core);
        while let Some(cause) = source {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
            source = cause.source();
        }
        if core.kind().is_retryable() {
            eprintln!("  {}", "this failure is transient; retrying later may succeed".yellow());
        }
    }
}
