use anyhow::Result;
use clap::Parser;
use gitpilot::adapters::git::GitAdapter;
use gitpilot::cli::{CliArgs, Command};
use gitpilot::commands;
use gitpilot::config::Config;
use gitpilot_core::Analyzer;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so stdout stays a clean report (or JSON document)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: CliArgs) -> Result<()> {
    let Some(command) = cli.command.clone() else {
        println!("Welcome to GitPilot v{}!", env!("CARGO_PKG_VERSION"));
        println!("Try 'gitpilot --help' for more information.");
        return Ok(());
    };

    let config = Config::from_cli_and_file(&cli)?;
    if !config.report.color || cli.json {
        colored::control::set_override(false);
    }
    debug!("Using config: {:?}", config);

    let analyzer = Analyzer::open(Arc::new(GitAdapter::new()), &cli.repo)?
        .with_preferred_remote(config.remotes.preferred.clone());

    match command {
        Command::BranchStatus {
            branch, no_probe, ..
        } => commands::run_branch_status(&analyzer, &config, &branch, !no_probe, cli.json),
        Command::ShowBranchStatus { show_files } => {
            commands::run_sweep(&analyzer, &config, show_files, cli.json)
        }
    }
}

fn main() {
    let cli = CliArgs::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        error!("Command failed: {:#}", err);
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
