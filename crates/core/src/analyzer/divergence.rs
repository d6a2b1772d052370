use super::Analyzer;
use crate::domain::{CommitId, DivergenceResult, WorkingTreeState};
use crate::error::{CoreError, Result};

impl Analyzer {
    /// Count commits exclusive to `local` (ahead) and to `remote` (behind).
    ///
    /// Asks the backend on every call; a fetch in between may change the
    /// answer. Disjoint histories are fine, every commit is then exclusive.
    pub fn diverge(&self, local: &CommitId, remote: &CommitId) -> Result<DivergenceResult> {
        if local == remote {
            return Ok(DivergenceResult::default());
        }

        let (ahead, behind) = self
            .git
            .count_exclusive_commits(&self.repo, local, remote)
            .map_err(CoreError::backend(
                "count exclusive commits",
                format!("{}...{}", local.short(), remote.short()),
            ))?;
        Ok(DivergenceResult::new(ahead, behind))
    }

    /// Current working-tree state, recomputed on every call
    pub fn working_tree(&self) -> Result<WorkingTreeState> {
        self.git
            .working_tree_status(&self.repo)
            .map_err(CoreError::backend(
                "read working tree status",
                self.repo.path.display().to_string(),
            ))
    }
}
