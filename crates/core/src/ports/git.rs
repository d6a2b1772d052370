use crate::domain::{
    CommitId, CommitSummary, MergeOptions, MergeOutcome, RepoHandle, WorkingTreeState,
};
use anyhow::Result;
use std::path::Path;

/// Lazy walk over commit history. Each call to
/// [`GitPort::commits_reachable_from`] starts a fresh one.
pub type CommitIter = Box<dyn Iterator<Item = Result<CommitSummary>> + Send>;

/// Port for the version-control backend.
///
/// Every call is blocking. Lookups that can legitimately miss return
/// `Ok(None)` rather than an error.
pub trait GitPort: Send + Sync {
    /// Open the repository containing `path`
    fn open_repository(&self, path: &Path) -> Result<RepoHandle>;

    /// Tip of `refs/heads/<name>`
    fn resolve_local_branch(&self, repo: &RepoHandle, name: &str) -> Result<Option<CommitId>>;

    /// Commit a fully qualified ref points at
    fn resolve_reference(&self, repo: &RepoHandle, ref_name: &str) -> Result<Option<CommitId>>;

    /// Local branches with their tips, in backend order
    fn list_branches(&self, repo: &RepoHandle) -> Result<Vec<(String, CommitId)>>;

    /// Names of configured remotes
    fn list_remotes(&self, repo: &RepoHandle) -> Result<Vec<String>>;

    /// Branch HEAD points at, None when detached or unborn
    fn current_branch(&self, repo: &RepoHandle) -> Result<Option<String>>;

    /// Commit HEAD points at, None while HEAD is unborn
    fn head_commit(&self, repo: &RepoHandle) -> Result<Option<CommitId>>;

    /// Every commit reachable from `from`, each exactly once
    fn commits_reachable_from(&self, repo: &RepoHandle, from: &CommitId) -> Result<CommitIter>;

    /// (commits only in `a`, commits only in `b`)
    fn count_exclusive_commits(
        &self,
        repo: &RepoHandle,
        a: &CommitId,
        b: &CommitId,
    ) -> Result<(usize, usize)>;

    /// Fresh status snapshot; never cached
    fn working_tree_status(&self, repo: &RepoHandle) -> Result<WorkingTreeState>;

    /// Update remote-tracking refs from `remote`
    fn fetch_remote(&self, repo: &RepoHandle, remote: &str) -> Result<()>;

    /// Merge `target` into the current branch, leaving the result in the
    /// index and working tree
    fn attempt_merge(
        &self,
        repo: &RepoHandle,
        target: &CommitId,
        options: MergeOptions,
    ) -> Result<MergeOutcome>;

    /// Throw away an in-progress merge and restore HEAD's tree
    fn abort_merge(&self, repo: &RepoHandle) -> Result<()>;

    fn merge_in_progress(&self, repo: &RepoHandle) -> Result<bool>;

    /// Patch text turning `a` into `b`
    fn diff_refs(&self, repo: &RepoHandle, a: &CommitId, b: &CommitId) -> Result<String>;
}
