use super::Analyzer;
use crate::domain::{BranchRef, BranchReport, CommitId, ProbeResult, RemoteStatus};
use crate::error::{CoreError, Result};
use tracing::{info, warn};

/// Knobs for [`Analyzer::branch_report`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Commits of history to include, 0 for all of them
    pub history_limit: usize,
    pub include_diff: bool,
    pub probe: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            history_limit: 20,
            include_diff: true,
            probe: true,
        }
    }
}

impl Analyzer {
    /// Everything known about one branch: history, standing against each
    /// remote, working tree, and a dry-run merge.
    pub fn branch_report(&self, name: &str, options: &ReportOptions) -> Result<BranchReport> {
        info!("Building report for branch '{}'", name);
        let branch = self.resolve(name)?;
        let current_branch = self
            .git
            .current_branch(&self.repo)
            .map_err(CoreError::backend("read HEAD", self.repo.path.display().to_string()))?;

        let (history, history_truncated) =
            self.history_page(&branch.local_commit, options.history_limit)?;
        let remotes = self.remote_statuses(&branch, options.include_diff)?;
        let working_tree = self.working_tree()?;

        let probe = if options.probe {
            self.probe_for(&branch, current_branch.as_deref())?
        } else {
            ProbeResult::Skipped {
                reason: "merge probing disabled".to_string(),
            }
        };

        Ok(BranchReport {
            branch,
            current_branch,
            history,
            history_truncated,
            remotes,
            working_tree,
            probe,
        })
    }

    fn remote_statuses(&self, branch: &BranchRef, include_diff: bool) -> Result<Vec<RemoteStatus>> {
        let remotes = self
            .git
            .list_remotes(&self.repo)
            .map_err(CoreError::backend("list remotes", branch.name.clone()))?;

        let mut statuses = Vec::with_capacity(remotes.len());
        for remote in remotes {
            let Some(tracking) = self.tracking_ref(&remote, &branch.name)? else {
                statuses.push(RemoteStatus {
                    remote,
                    tracking: None,
                    divergence: None,
                    verdict: None,
                    diff: None,
                });
                continue;
            };

            let divergence = self.diverge(&branch.local_commit, &tracking.commit)?;
            let diff = if include_diff {
                let diff = self
                    .git
                    .diff_refs(&self.repo, &branch.local_commit, &tracking.commit)
                    .map_err(CoreError::backend(
                        "diff refs",
                        format!("{}..{}", branch.local_ref_name(), tracking.ref_name),
                    ))?;
                Some(diff)
            } else {
                None
            };

            statuses.push(RemoteStatus {
                remote,
                verdict: Some(divergence.verdict()),
                divergence: Some(divergence),
                tracking: Some(tracking),
                diff,
            });
        }
        Ok(statuses)
    }

    /// Another branch is probed by merging its tip into HEAD. The checked-out
    /// branch is probed against its remote, which is what a pull would merge.
    fn probe_target(branch: &BranchRef, current_branch: Option<&str>) -> Option<CommitId> {
        if current_branch == Some(branch.name.as_str()) {
            branch.remote_commit().cloned()
        } else {
            Some(branch.local_commit.clone())
        }
    }

    fn probe_for(&self, branch: &BranchRef, current_branch: Option<&str>) -> Result<ProbeResult> {
        let Some(target) = Self::probe_target(branch, current_branch) else {
            return Ok(ProbeResult::Skipped {
                reason: format!(
                    "'{}' is checked out and has no remote counterpart to merge",
                    branch.name
                ),
            });
        };

        match self.probe_merge(&target) {
            Ok(report) => Ok(ProbeResult::Completed(report)),
            Err(CoreError::PreconditionFailed { reason }) => {
                warn!("Skipping merge probe: {}", reason);
                Ok(ProbeResult::Skipped { reason })
            }
            Err(err) => Err(err),
        }
    }
}
