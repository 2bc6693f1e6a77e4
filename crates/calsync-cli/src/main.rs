//! calsync-setup
//!
//! Bootstraps a calsync checkout: Python runtime, dependencies, launcher,
//! configuration, periodic scheduling and a first sync.

mod cli;
mod error;
mod logging;

use std::sync::Arc;

use calsync_core::{BootstrapContext, BootstrapReport, Orchestrator, SystemRunner, Termination};
use clap::Parser;
use colored::Colorize;

use cli::Cli;
use error::{CliError, Result};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    if !dir.is_dir() {
        return Err(CliError::user(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let context = BootstrapContext::from_env(&dir)?;
    tracing::debug!(
        root = %context.root.display(),
        interactive = context.interactive,
        "bootstrap context"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let orchestrator = Orchestrator::new(context, Arc::new(SystemRunner::new()));
    let report = runtime.block_on(orchestrator.run());

    print_summary(&report, orchestrator.context());
    Ok(report.exit_code())
}

fn print_summary(report: &BootstrapReport, context: &BootstrapContext) {
    match report.termination() {
        Termination::Completed => {
            println!(
                "{} Setup complete. Run {} to sync manually.",
                "OK".green().bold(),
                context.launcher_path().display().to_string().cyan()
            );
        }
        Termination::SyncFailed => {
            println!(
                "{} Setup complete, but the initial sync failed. Run {} to retry.",
                "WARN".yellow().bold(),
                context.launcher_path().display().to_string().cyan()
            );
        }
        Termination::AwaitingEdit => {
            println!(
                "{} Edit {}, then run {} again.",
                "NEXT".cyan().bold(),
                context.config_path().display(),
                "calsync-setup".cyan()
            );
        }
        Termination::Aborted => {
            if let Some(fatal) = &report.fatal {
                eprintln!("{}: {}", "error".red().bold(), fatal);
            }
        }
    }
}
