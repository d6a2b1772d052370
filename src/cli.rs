use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(name = "gitpilot")]
#[command(version)]
#[command(about = "GitPilot: A CLI tool to enhance your Git workflow")]
#[command(
    long_about = "GitPilot helps you manage Git branches, track remote status, and spot merge conflicts before they happen."
)]
pub struct CliArgs {
    /// Repository to analyse (searched upwards from this path)
    #[arg(long, global = true, default_value = ".")]
    pub repo: PathBuf,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output (overrides config)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Display the status of a branch
    BranchStatus {
        /// Specify the branch name
        #[arg(short, long)]
        branch: String,

        /// Number of commits of history to show, 0 for all (overrides config)
        #[arg(long)]
        limit: Option<usize>,

        /// Do not print the diff against each remote
        #[arg(long)]
        no_diff: bool,

        /// Skip the dry-run merge
        #[arg(long)]
        no_probe: bool,
    },
    /// List all branches with their status relative to remote, and show file modification status
    ShowBranchStatus {
        /// List the modified files under each branch
        #[arg(long)]
        show_files: bool,
    },
}
