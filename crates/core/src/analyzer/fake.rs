//! In-memory [`GitPort`] for exercising the analyzer without a repository.

use crate::Analyzer;
use crate::domain::{
    Author, CommitId, CommitSummary, MergeOptions, MergeOutcome, RepoHandle, Timestamp,
    WorkingTreeState,
};
use crate::ports::{CommitIter, GitPort};
use anyhow::{Result, anyhow, bail};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct State {
    parents: HashMap<String, Vec<String>>,
    branches: Vec<String>,
    refs: HashMap<String, String>,
    remotes: Vec<String>,
    head: Option<String>,
    unborn_head: bool,
    dirty: Vec<String>,
    merging: bool,
    merge_outcome: Option<MergeOutcome>,
    merge_error: bool,
    abort_error: bool,
    abort_leaves_merge: bool,
    fetch_errors: HashSet<String>,
    fetch_updates: Vec<(String, String)>,
    fetched: Vec<String>,
    broken_branches: HashSet<String>,
    calls: HashMap<&'static str, usize>,
}

/// Cloning shares state, so a test can keep a handle while the analyzer owns another
#[derive(Clone, Default)]
pub(crate) struct FakeGit {
    state: Arc<Mutex<State>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn commit(self, id: &str, parents: &[&str]) -> Self {
        self.lock()
            .parents
            .insert(id.to_string(), parents.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn branch(self, name: &str, commit: &str) -> Self {
        {
            let mut state = self.lock();
            state.branches.push(name.to_string());
            state.refs.insert(format!("refs/heads/{}", name), commit.to_string());
        }
        self
    }

    pub fn remote(self, name: &str) -> Self {
        self.lock().remotes.push(name.to_string());
        self
    }

    pub fn reference(self, ref_name: &str, commit: &str) -> Self {
        self.lock().refs.insert(ref_name.to_string(), commit.to_string());
        self
    }

    pub fn head(self, branch: &str) -> Self {
        self.lock().head = Some(branch.to_string());
        self
    }

    /// HEAD names a branch that has no commits yet
    pub fn unborn_head(self) -> Self {
        self.lock().unborn_head = true;
        self
    }

    pub fn merge_result(self, outcome: MergeOutcome) -> Self {
        self.lock().merge_outcome = Some(outcome);
        self
    }

    pub fn failing_merge(self) -> Self {
        self.lock().merge_error = true;
        self
    }

    pub fn failing_abort(self) -> Self {
        self.lock().abort_error = true;
        self
    }

    /// Abort reports success but leaves the merge state behind
    pub fn lying_abort(self) -> Self {
        self.lock().abort_leaves_merge = true;
        self
    }

    pub fn failing_fetch(self, remote: &str) -> Self {
        self.lock().fetch_errors.insert(remote.to_string());
        self
    }

    /// Ref update applied by the next successful fetch
    pub fn on_fetch(self, ref_name: &str, commit: &str) -> Self {
        self.lock()
            .fetch_updates
            .push((ref_name.to_string(), commit.to_string()));
        self
    }

    /// Local branch that is listed but cannot be resolved
    pub fn broken_branch(self, name: &str) -> Self {
        self.lock().broken_branches.insert(name.to_string());
        self
    }

    pub fn set_dirty(&self, paths: &[&str]) {
        self.lock().dirty = paths.iter().map(|p| p.to_string()).collect();
    }

    pub fn is_merging(&self) -> bool {
        self.lock().merging
    }

    pub fn dirty(&self) -> Vec<String> {
        self.lock().dirty.clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.lock().fetched.clone()
    }

    pub fn calls(&self, op: &str) -> usize {
        self.lock().calls.get(op).copied().unwrap_or(0)
    }

    pub fn analyzer(self) -> Analyzer {
        Analyzer::new(Arc::new(self), RepoHandle::new("/fake/repo"))
    }

    fn record(&self, op: &'static str) -> MutexGuard<'_, State> {
        let mut state = self.lock();
        *state.calls.entry(op).or_default() += 1;
        state
    }
}

impl State {
    fn reachable(&self, from: &str) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([from.to_string()]);
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id.clone()) {
                continue;
            }
            let parents = self
                .parents
                .get(&id)
                .ok_or_else(|| anyhow!("unknown commit {}", id))?;
            queue.extend(parents.iter().cloned());
            order.push(id);
        }
        Ok(order)
    }
}

impl GitPort for FakeGit {
    fn open_repository(&self, path: &Path) -> Result<RepoHandle> {
        Ok(RepoHandle::new(path))
    }

    fn resolve_local_branch(&self, _repo: &RepoHandle, name: &str) -> Result<Option<CommitId>> {
        let state = self.record("resolve_local_branch");
        if state.broken_branches.contains(name) {
            bail!("corrupt ref refs/heads/{}", name);
        }
        Ok(state.refs.get(&format!("refs/heads/{}", name)).map(CommitId::new))
    }

    fn resolve_reference(&self, _repo: &RepoHandle, ref_name: &str) -> Result<Option<CommitId>> {
        Ok(self.lock().refs.get(ref_name).map(CommitId::new))
    }

    fn list_branches(&self, _repo: &RepoHandle) -> Result<Vec<(String, CommitId)>> {
        let state = self.lock();
        Ok(state
            .branches
            .iter()
            .map(|name| {
                let tip = state.refs.get(&format!("refs/heads/{}", name)).cloned();
                (name.clone(), CommitId::new(tip.unwrap_or_default()))
            })
            .collect())
    }

    fn list_remotes(&self, _repo: &RepoHandle) -> Result<Vec<String>> {
        Ok(self.lock().remotes.clone())
    }

    fn current_branch(&self, _repo: &RepoHandle) -> Result<Option<String>> {
        Ok(self.lock().head.clone())
    }

    fn head_commit(&self, _repo: &RepoHandle) -> Result<Option<CommitId>> {
        let state = self.lock();
        if state.unborn_head {
            return Ok(None);
        }
        let tip = state
            .head
            .as_ref()
            .and_then(|branch| state.refs.get(&format!("refs/heads/{}", branch)));
        Ok(Some(CommitId::new(tip.cloned().unwrap_or_else(|| "detached".to_string()))))
    }

    fn commits_reachable_from(&self, _repo: &RepoHandle, from: &CommitId) -> Result<CommitIter> {
        let ids = self.lock().reachable(&from.0)?;
        let commits = ids.into_iter().enumerate().map(|(i, id)| {
            Ok(CommitSummary {
                message: format!("commit {}\n\nbody", id),
                id: CommitId::new(id),
                author: Author {
                    name: "Test User".to_string(),
                    email: "test@example.com".to_string(),
                },
                timestamp: Timestamp::new(1_700_000_000 - i as i64, 0),
            })
        });
        Ok(Box::new(commits.collect::<Vec<_>>().into_iter()))
    }

    fn count_exclusive_commits(
        &self,
        _repo: &RepoHandle,
        a: &CommitId,
        b: &CommitId,
    ) -> Result<(usize, usize)> {
        let state = self.record("count_exclusive_commits");
        let left: HashSet<_> = state.reachable(&a.0)?.into_iter().collect();
        let right: HashSet<_> = state.reachable(&b.0)?.into_iter().collect();
        Ok((left.difference(&right).count(), right.difference(&left).count()))
    }

    fn working_tree_status(&self, _repo: &RepoHandle) -> Result<WorkingTreeState> {
        let state = self.record("working_tree_status");
        Ok(WorkingTreeState::from_paths(state.dirty.clone()))
    }

    fn fetch_remote(&self, _repo: &RepoHandle, remote: &str) -> Result<()> {
        let mut state = self.record("fetch_remote");
        if state.fetch_errors.contains(remote) {
            bail!("could not connect to '{}'", remote);
        }
        state.fetched.push(remote.to_string());
        let updates = std::mem::take(&mut state.fetch_updates);
        state.refs.extend(updates);
        Ok(())
    }

    fn attempt_merge(
        &self,
        _repo: &RepoHandle,
        target: &CommitId,
        options: MergeOptions,
    ) -> Result<MergeOutcome> {
        assert_eq!(options, MergeOptions::DRY_RUN);
        let mut state = self.record("attempt_merge");
        let head_tip = state
            .head
            .as_ref()
            .and_then(|branch| state.refs.get(&format!("refs/heads/{}", branch)))
            .cloned();
        if let Some(tip) = head_tip
            && state
                .reachable(&tip)
                .is_ok_and(|ids| ids.contains(&target.0))
        {
            return Ok(MergeOutcome::Untouched);
        }
        state.merging = true;
        if state.merge_error {
            state.dirty.push("half-written.txt".to_string());
            bail!("checkout of {} failed midway", target);
        }
        let outcome = state.merge_outcome.clone().unwrap_or(MergeOutcome::Clean);
        match &outcome {
            MergeOutcome::Untouched => {}
            MergeOutcome::Clean => state.dirty.push("staged-by-merge.txt".to_string()),
            MergeOutcome::Conflicts { files, .. } => state.dirty.extend(files.iter().cloned()),
        }
        Ok(outcome)
    }

    fn abort_merge(&self, _repo: &RepoHandle) -> Result<()> {
        let mut state = self.record("abort_merge");
        if state.abort_error {
            bail!("index.lock exists");
        }
        if !state.abort_leaves_merge {
            state.merging = false;
            state.dirty.clear();
        }
        Ok(())
    }

    fn merge_in_progress(&self, _repo: &RepoHandle) -> Result<bool> {
        Ok(self.lock().merging)
    }

    fn diff_refs(&self, _repo: &RepoHandle, a: &CommitId, b: &CommitId) -> Result<String> {
        Ok(format!("diff {}..{}\n", a, b))
    }
}
