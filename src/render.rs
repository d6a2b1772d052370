//! Human-readable rendering of reports.
//!
//! Functions build strings rather than printing so the layout can be tested;
//! the command layer decides where they go.

use chrono::{DateTime, FixedOffset};
use colored::{ColoredString, Colorize};
use gitpilot_core::domain::{
    BranchReport, CommitSummary, ConflictReport, DivergenceResult, ProbeResult, RemoteStatus,
    SweepEntry, SweepOutcome, SweepReport, Timestamp, Verdict, WorkingTreeState,
};
use std::fmt::Write as _;

/// Render a commit timestamp in the commit's own timezone, git-log style
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    let utc = DateTime::from_timestamp(timestamp.seconds, 0);
    let offset = FixedOffset::east_opt(timestamp.offset_minutes * 60);
    match (utc, offset) {
        (Some(utc), Some(offset)) => utc
            .with_timezone(&offset)
            .format("%a %b %e %H:%M:%S %Y %z")
            .to_string(),
        _ => timestamp.to_string(),
    }
}

fn verdict_line(verdict: Verdict) -> ColoredString {
    match verdict {
        Verdict::UpToDate => "Branch is up to date.".green(),
        Verdict::PushNeeded => "Push is needed.".red(),
        Verdict::PullNeeded => "Pull is needed.".red(),
        Verdict::MergeNeeded => "Merge is needed.".red(),
    }
}

fn write_divergence(out: &mut String, divergence: &DivergenceResult) {
    if divergence.ahead > 0 {
        let _ = writeln!(out, "{}", format!("Ahead by {} commits", divergence.ahead).green());
    }
    if divergence.behind > 0 {
        let _ = writeln!(out, "{}", format!("Behind by {} commits", divergence.behind).yellow());
    }
    let _ = writeln!(out, "{}", verdict_line(divergence.verdict()));
}

/// Warns only when the verdict needs a pull or merge that the dirty tree would block
fn write_blocked(out: &mut String, tree: &WorkingTreeState, verdict: Verdict) {
    if tree.blocks(verdict) {
        let _ = writeln!(
            out,
            "{}",
            "Files are modified, please commit them before merging or pulling.\nRun 'git status' for more information."
                .red()
        );
    }
}

fn write_working_tree(out: &mut String, tree: &WorkingTreeState, show_files: bool) {
    if tree.is_dirty {
        let _ = writeln!(
            out,
            "{}",
            format!("{} uncommitted change(s).", tree.changed_paths.len()).yellow()
        );
        if show_files {
            for path in &tree.changed_paths {
                let _ = writeln!(out, "  {}", path.yellow());
            }
        }
    } else {
        let _ = writeln!(out, "{}", "No modifications or new files.".green());
    }
}

fn write_commit(out: &mut String, commit: &CommitSummary) {
    let _ = writeln!(out, "Commit: {}", commit.id.to_string().yellow());
    let _ = writeln!(out, "Author: {}", commit.author.name);
    let _ = writeln!(out, "Date: {}", format_timestamp(&commit.timestamp));
    let _ = writeln!(out, "Message: {}", commit.message);
    out.push('\n');
}

fn write_remote(out: &mut String, branch: &str, status: &RemoteStatus, tree: &WorkingTreeState) {
    let _ = writeln!(out, "Remote: {}", status.remote.bright_blue());
    let Some(tracking) = &status.tracking else {
        let _ = writeln!(out, "{}", format!("Remote branch '{}' does not exist.", branch).red());
        return;
    };
    let _ = writeln!(out, "Remote SHA: {}", tracking.commit);
    if let Some(divergence) = &status.divergence {
        write_divergence(out, divergence);
        write_blocked(out, tree, divergence.verdict());
    }
    if let Some(diff) = &status.diff {
        let _ = writeln!(out, "Compare with remote:");
        let _ = writeln!(out, "{}", diff);
    }
}

fn write_conflicts(out: &mut String, report: &ConflictReport) {
    if report.has_conflicts {
        let _ = writeln!(out, "{}", "Merge conflicts detected:".red().bold());
        let _ = writeln!(out, "{}", report.raw_output);
    } else {
        let _ = writeln!(out, "{}", "No merge conflicts detected.".green());
    }
}

/// Single-branch deep report
pub fn render_branch_report(report: &BranchReport) -> String {
    let mut out = String::new();
    let name = &report.branch.name;
    let _ = writeln!(out, "Branch: {}", name.bright_magenta().bold());

    let _ = writeln!(out, "\n{}", "Commit History:".bright_cyan().bold());
    for commit in &report.history {
        write_commit(&mut out, commit);
    }
    if report.history_truncated {
        let _ = writeln!(out, "{}\n", "(older commits not shown)".italic());
    }

    let _ = writeln!(out, "\n{}", "Remote Status:".bright_cyan().bold());
    if report.remotes.is_empty() {
        let _ = writeln!(out, "{}", "No remotes configured.".red());
    }
    for status in &report.remotes {
        write_remote(&mut out, name, status, &report.working_tree);
    }

    let _ = writeln!(out, "\n{}", "Working Tree:".bright_cyan().bold());
    write_working_tree(&mut out, &report.working_tree, true);

    let _ = writeln!(
        out,
        "\n{}",
        "Checking for potential merge conflicts:".bright_cyan().bold()
    );
    match &report.probe {
        ProbeResult::Completed(conflicts) => write_conflicts(&mut out, conflicts),
        ProbeResult::Skipped { reason } => {
            let _ = writeln!(out, "{}", format!("Merge probe skipped: {}", reason).yellow());
        }
    }
    out
}

fn write_sweep_entry(out: &mut String, entry: &SweepEntry, show_files: bool) {
    let _ = writeln!(out, "\nBranch: {}", entry.branch.bright_magenta().bold());
    match &entry.outcome {
        SweepOutcome::RemoteAbsent => {
            let _ = writeln!(
                out,
                "{}",
                format!("Remote branch '{}' does not exist.", entry.branch).red()
            );
        }
        SweepOutcome::Compared { divergence, verdict, .. } => {
            write_divergence(out, divergence);
            if let Some(tree) = &entry.working_tree {
                write_blocked(out, tree, *verdict);
            }
        }
        SweepOutcome::Failed { error } => {
            let _ = writeln!(out, "{}", format!("Could not analyse branch: {}", error).red());
        }
    }
    match &entry.working_tree {
        Some(tree) => write_working_tree(out, tree, show_files),
        None => {
            let _ = writeln!(out, "{}", "Working tree status unavailable.".red());
        }
    }
}

/// Fleet-wide sweep, one block per branch
pub fn render_sweep(report: &SweepReport, show_files: bool) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        write_sweep_entry(&mut out, entry, show_files);
    }
    out
}
