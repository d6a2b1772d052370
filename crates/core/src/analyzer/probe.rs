use super::Analyzer;
use crate::domain::{CommitId, ConflictReport, MergeOptions, MergeOutcome, RepoHandle};
use crate::error::{CoreError, Result};
use crate::ports::GitPort;
use anyhow::anyhow;
use tracing::{debug, error, info};

impl Analyzer {
    /// Dry-run merge of `target` into the current branch.
    ///
    /// Requires a born HEAD, a clean working tree and no merge already in
    /// progress. Any merge that touched the repository is rolled back before
    /// this returns, and the rollback is verified; if the repository cannot
    /// be restored the result is [`CoreError::AbortFailed`], whatever the
    /// merge itself reported.
    pub fn probe_merge(&self, target: &CommitId) -> Result<ConflictReport> {
        let head = self
            .git
            .head_commit(&self.repo)
            .map_err(CoreError::backend("read HEAD", target.to_string()))?;
        if head.is_none() {
            return Err(CoreError::PreconditionFailed {
                reason: "HEAD has no commits yet, so there is nothing to merge into".to_string(),
            });
        }

        let tree = self.working_tree()?;
        if tree.is_dirty {
            return Err(CoreError::PreconditionFailed {
                reason: format!(
                    "working tree has {} uncommitted change(s); commit or stash them before probing a merge",
                    tree.changed_paths.len()
                ),
            });
        }
        let merging = self
            .git
            .merge_in_progress(&self.repo)
            .map_err(CoreError::backend("read repository state", target.to_string()))?;
        if merging {
            return Err(CoreError::PreconditionFailed {
                reason: "a merge is already in progress".to_string(),
            });
        }

        debug!("Attempting dry-run merge of {}", target);
        let guard = RollbackGuard::arm(self.git.as_ref(), &self.repo, target);
        let attempt = self.git.attempt_merge(&self.repo, target, MergeOptions::DRY_RUN);
        if matches!(attempt, Ok(MergeOutcome::Untouched)) {
            guard.disarm();
        } else {
            guard.release()?;
        }

        let outcome = attempt.map_err(CoreError::backend("attempt merge", target.to_string()))?;
        let report = ConflictReport::from_outcome(target.clone(), outcome);
        info!(
            "Dry-run merge of {} finished: conflicts={}",
            target.short(),
            report.has_conflicts
        );
        Ok(report)
    }
}

/// Holds the "merge in progress" state for the duration of a probe.
///
/// `release` rolls back and reports failure. If the guard is dropped while
/// still armed (a panic between arm and release) the rollback runs from
/// `Drop` and a failure can only be logged.
struct RollbackGuard<'a> {
    git: &'a dyn GitPort,
    repo: &'a RepoHandle,
    target: &'a CommitId,
    armed: bool,
}

impl<'a> RollbackGuard<'a> {
    fn arm(git: &'a dyn GitPort, repo: &'a RepoHandle, target: &'a CommitId) -> Self {
        Self {
            git,
            repo,
            target,
            armed: true,
        }
    }

    /// The merge wrote nothing, so there is nothing to roll back
    fn disarm(mut self) {
        self.armed = false;
        debug!("Nothing to roll back for {}", self.target);
    }

    fn release(mut self) -> Result<()> {
        self.armed = false;
        let result = self.rollback();
        if let Err(CoreError::AbortFailed { source, .. }) = &result {
            error!(
                "Dry-run merge of {} could not be rolled back: {:#}",
                self.target, source
            );
        }
        result
    }

    fn rollback(&self) -> Result<()> {
        let abort_failed = |source| CoreError::AbortFailed {
            target: self.target.to_string(),
            source,
        };

        self.git.abort_merge(self.repo).map_err(abort_failed)?;

        let still_merging = self.git.merge_in_progress(self.repo).map_err(abort_failed)?;
        let tree = self.git.working_tree_status(self.repo).map_err(abort_failed)?;
        if still_merging || tree.is_dirty {
            return Err(abort_failed(anyhow!(
                "repository not restored after abort (merge in progress: {}, changed paths: {})",
                still_merging,
                tree.changed_paths.join(", ")
            )));
        }
        debug!("Rolled back dry-run merge of {}", self.target);
        Ok(())
    }
}

impl Drop for RollbackGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(err) = self.rollback() {
                error!("Rollback during unwind failed: {}", err);
            }
        }
    }
}
