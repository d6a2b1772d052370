use super::Analyzer;
use crate::domain::{BranchRef, TrackingRef};
use crate::error::{CoreError, Result};
use tracing::debug;

impl Analyzer {
    /// Resolve a local branch and its remote counterpart.
    ///
    /// The preferred remote wins when several remotes carry the branch,
    /// otherwise remotes are tried in configuration order. A branch no remote
    /// knows about resolves with `remote: None`.
    pub fn resolve(&self, name: &str) -> Result<BranchRef> {
        let local_commit = self
            .git
            .resolve_local_branch(&self.repo, name)
            .map_err(CoreError::backend("resolve local branch", name))?
            .ok_or_else(|| CoreError::BranchNotFound {
                name: name.to_string(),
            })?;

        let mut tracking = self.tracking_refs(name)?;
        let preferred = tracking
            .iter()
            .position(|t| t.remote == self.preferred_remote)
            .unwrap_or(0);
        let remote = if tracking.is_empty() {
            debug!("Branch '{}' has no remote counterpart", name);
            None
        } else {
            Some(tracking.swap_remove(preferred))
        };

        Ok(BranchRef {
            name: name.to_string(),
            local_commit,
            remote,
        })
    }

    /// Tracking refs for `branch` on every configured remote that has one
    pub fn tracking_refs(&self, branch: &str) -> Result<Vec<TrackingRef>> {
        let remotes = self
            .git
            .list_remotes(&self.repo)
            .map_err(CoreError::backend("list remotes", branch))?;

        let mut found = Vec::new();
        for remote in remotes {
            if let Some(tracking) = self.tracking_ref(&remote, branch)? {
                found.push(tracking);
            }
        }
        Ok(found)
    }

    /// Tracking ref for `branch` on one remote, if the remote has it
    pub fn tracking_ref(&self, remote: &str, branch: &str) -> Result<Option<TrackingRef>> {
        let ref_name = TrackingRef::ref_name_for(remote, branch);
        let commit = self
            .git
            .resolve_reference(&self.repo, &ref_name)
            .map_err(CoreError::backend("resolve reference", ref_name.clone()))?;
        Ok(commit.map(|commit| TrackingRef {
            remote: remote.to_string(),
            ref_name,
            commit,
        }))
    }
}
