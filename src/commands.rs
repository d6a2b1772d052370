use anyhow::{Context, Result};
use gitpilot_core::Analyzer;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::render;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

/// Run the single-branch report: history, remotes, working tree, dry-run merge
pub fn run_branch_status(
    analyzer: &Analyzer,
    config: &Config,
    branch: &str,
    probe: bool,
    json: bool,
) -> Result<()> {
    let report = analyzer
        .branch_report(branch, &config.report_options(probe))
        .with_context(|| format!("branch-status failed for '{}'", branch))?;

    if json {
        print_json(&report)
    } else {
        print!("{}", render::render_branch_report(&report));
        Ok(())
    }
}

/// Run the sweep over every local branch
pub fn run_sweep(analyzer: &Analyzer, config: &Config, show_files: bool, json: bool) -> Result<()> {
    let report = analyzer
        .sweep(&config.remotes.fetch)
        .context("show-branch-status failed")?;
    info!(
        "Swept {} branches after fetching {:?}",
        report.entries.len(),
        report.fetched_remotes
    );

    if json {
        print_json(&report)
    } else {
        print!("{}", render::render_sweep(&report, show_files));
        Ok(())
    }
}
