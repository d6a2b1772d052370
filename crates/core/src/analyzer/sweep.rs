use super::Analyzer;
use crate::domain::{CommitId, SweepEntry, SweepOutcome, SweepReport};
use crate::error::{CoreError, Result};
use tracing::{info, warn};

impl Analyzer {
    /// Fetch, then compare every local branch against its remote counterpart.
    ///
    /// `remotes` names the remotes to fetch; empty means all configured
    /// remotes. A failed fetch aborts the sweep since every verdict after it
    /// would be computed from stale refs. Problems with an individual branch
    /// are recorded on its entry and the sweep moves on. Never probes merges.
    pub fn sweep(&self, remotes: &[String]) -> Result<SweepReport> {
        let remotes = if remotes.is_empty() {
            self.git
                .list_remotes(&self.repo)
                .map_err(CoreError::backend("list remotes", self.repo.path.display().to_string()))?
        } else {
            remotes.to_vec()
        };

        for remote in &remotes {
            info!("Fetching from remote '{}'", remote);
            self.git
                .fetch_remote(&self.repo, remote)
                .map_err(|source| CoreError::Network {
                    remote: remote.clone(),
                    source,
                })?;
        }

        let branches = self
            .git
            .list_branches(&self.repo)
            .map_err(CoreError::backend("list branches", self.repo.path.display().to_string()))?;
        info!("Sweeping {} local branches", branches.len());

        let entries = branches
            .into_iter()
            .map(|(name, tip)| self.sweep_branch(name, tip))
            .collect();

        Ok(SweepReport {
            fetched_remotes: remotes,
            entries,
        })
    }

    fn sweep_branch(&self, name: String, tip: CommitId) -> SweepEntry {
        let outcome = self.compare_with_remote(&name).unwrap_or_else(|err| {
            warn!("Could not analyse branch '{}': {}", name, err.describe());
            SweepOutcome::Failed {
                error: err.describe(),
            }
        });

        // Re-read per branch: the tree may be edited while a long sweep runs
        let working_tree = match self.working_tree() {
            Ok(state) => Some(state),
            Err(err) => {
                warn!("Could not read working tree status: {}", err.describe());
                None
            }
        };

        SweepEntry {
            branch: name,
            local_commit: tip,
            outcome,
            working_tree,
        }
    }

    fn compare_with_remote(&self, name: &str) -> Result<SweepOutcome> {
        let branch = self.resolve(name)?;
        let Some(remote) = branch.remote else {
            return Ok(SweepOutcome::RemoteAbsent);
        };
        let divergence = self.diverge(&branch.local_commit, &remote.commit)?;
        Ok(SweepOutcome::Compared {
            verdict: divergence.verdict(),
            remote,
            divergence,
        })
    }
}
