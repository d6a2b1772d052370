use anyhow::{Context, Result, bail};
use git2::{
    BranchType, Commit as GitCommit, DiffFormat, ErrorCode, ObjectType, Oid, Repository as GitRepository,
    RepositoryState, ResetType, Sort, StatusOptions, build::CheckoutBuilder,
};
use gitpilot_core::domain::{
    Author, CommitId, CommitSummary, MergeOptions, MergeOutcome, RepoHandle, Timestamp,
    WorkingTreeState,
};
use gitpilot_core::ports::{CommitIter, GitPort};
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

/// Git adapter that implements GitPort using git2.
///
/// Holds no state: every call reopens the repository named by the handle,
/// so a probe and a status read never share a stale index.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitAdapter;

impl GitAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Open git repository for the given handle
    fn open_repo(&self, repo: &RepoHandle) -> Result<GitRepository> {
        GitRepository::open(&repo.path)
            .with_context(|| format!("Failed to open git repository at {}", repo.path.display()))
    }
}

fn to_oid(id: &CommitId) -> Result<Oid> {
    Oid::from_str(&id.0).with_context(|| format!("Invalid commit id: {}", id))
}

fn to_commit_id(oid: Oid) -> CommitId {
    CommitId::new(oid.to_string())
}

fn summarize(commit: &GitCommit<'_>) -> CommitSummary {
    let author = commit.author();
    let when = author.when();
    CommitSummary {
        id: to_commit_id(commit.id()),
        author: Author {
            name: String::from_utf8_lossy(author.name_bytes()).into_owned(),
            email: String::from_utf8_lossy(author.email_bytes()).into_owned(),
        },
        message: String::from_utf8_lossy(commit.message_bytes())
            .trim_end()
            .to_string(),
        timestamp: Timestamp::new(when.seconds(), when.offset_minutes()),
    }
}

/// History in git's time order. The revwalk settles the order up front;
/// commits are only read as the iterator reaches them, so the walk can own
/// its repository and outlive the call that created it.
struct HistoryWalk {
    repo: GitRepository,
    ids: std::vec::IntoIter<Oid>,
}

impl HistoryWalk {
    fn new(repo: GitRepository, from: Oid) -> Result<Self> {
        let ids = {
            let mut revwalk = repo.revwalk().context("Failed to start revwalk")?;
            revwalk.set_sorting(Sort::TIME)?;
            revwalk
                .push(from)
                .with_context(|| format!("Commit {} not found", from))?;
            revwalk
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("Failed to walk history")?
        };
        Ok(Self {
            repo,
            ids: ids.into_iter(),
        })
    }
}

impl Iterator for HistoryWalk {
    type Item = Result<CommitSummary>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.ids.next()?;
        let commit = self
            .repo
            .find_commit(oid)
            .with_context(|| format!("Commit {} not found", oid));
        Some(commit.map(|commit| summarize(&commit)))
    }
}

/// Mirrors the wording of command-line git so the output reads familiar
fn conflict_output(conflicts: &[(String, &'static str)]) -> String {
    let mut output = String::new();
    for (path, kind) in conflicts {
        let _ = writeln!(output, "CONFLICT ({}): Merge conflict in {}", kind, path);
    }
    output.push_str("Automatic merge failed; fix conflicts and then commit the result.\n");
    output
}

impl GitPort for GitAdapter {
    fn open_repository(&self, path: &Path) -> Result<RepoHandle> {
        let git_repo = GitRepository::discover(path)
            .with_context(|| format!("Failed to discover git repository from {}", path.display()))?;
        if git_repo.is_bare() {
            bail!("Bare repositories have no working tree to analyse");
        }
        Ok(RepoHandle::new(git_repo.path()))
    }

    fn resolve_local_branch(&self, repo: &RepoHandle, name: &str) -> Result<Option<CommitId>> {
        let git_repo = self.open_repo(repo)?;
        let branch = match git_repo.find_branch(name, BranchType::Local) {
            Ok(branch) => branch,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to look up branch '{}'", name)),
        };
        let commit = branch
            .get()
            .peel_to_commit()
            .with_context(|| format!("Branch '{}' does not point at a commit", name))?;
        Ok(Some(to_commit_id(commit.id())))
    }

    fn resolve_reference(&self, repo: &RepoHandle, ref_name: &str) -> Result<Option<CommitId>> {
        let git_repo = self.open_repo(repo)?;
        let reference = match git_repo.find_reference(ref_name) {
            Ok(reference) => reference,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to look up {}", ref_name)),
        };
        let commit = reference
            .peel_to_commit()
            .with_context(|| format!("{} does not point at a commit", ref_name))?;
        Ok(Some(to_commit_id(commit.id())))
    }

    fn list_branches(&self, repo: &RepoHandle) -> Result<Vec<(String, CommitId)>> {
        let git_repo = self.open_repo(repo)?;
        let mut branches = Vec::new();
        for entry in git_repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            let Some(name) = branch.name()?.map(str::to_string) else {
                debug!("Skipping branch with a non-UTF-8 name");
                continue;
            };
            let tip = branch
                .get()
                .peel_to_commit()
                .with_context(|| format!("Branch '{}' does not point at a commit", name))?;
            branches.push((name, to_commit_id(tip.id())));
        }
        Ok(branches)
    }

    fn list_remotes(&self, repo: &RepoHandle) -> Result<Vec<String>> {
        let git_repo = self.open_repo(repo)?;
        let remotes = git_repo.remotes().context("Failed to list remotes")?;
        Ok(remotes.iter().flatten().map(str::to_string).collect())
    }

    fn current_branch(&self, repo: &RepoHandle) -> Result<Option<String>> {
        let git_repo = self.open_repo(repo)?;
        let head = match git_repo.head() {
            Ok(head) => head,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(None);
            }
            Err(e) => return Err(e).context("Failed to read HEAD"),
        };
        if head.is_branch() {
            Ok(head.shorthand().map(str::to_string))
        } else {
            Ok(None)
        }
    }

    fn head_commit(&self, repo: &RepoHandle) -> Result<Option<CommitId>> {
        let git_repo = self.open_repo(repo)?;
        let head = match git_repo.head() {
            Ok(head) => head,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(None);
            }
            Err(e) => return Err(e).context("Failed to read HEAD"),
        };
        let commit = head.peel_to_commit().context("HEAD does not point at a commit")?;
        Ok(Some(to_commit_id(commit.id())))
    }

    fn commits_reachable_from(&self, repo: &RepoHandle, from: &CommitId) -> Result<CommitIter> {
        let git_repo = self.open_repo(repo)?;
        Ok(Box::new(HistoryWalk::new(git_repo, to_oid(from)?)?))
    }

    fn count_exclusive_commits(
        &self,
        repo: &RepoHandle,
        a: &CommitId,
        b: &CommitId,
    ) -> Result<(usize, usize)> {
        let git_repo = self.open_repo(repo)?;
        git_repo
            .graph_ahead_behind(to_oid(a)?, to_oid(b)?)
            .context("Failed to calculate ahead/behind counts")
    }

    fn working_tree_status(&self, repo: &RepoHandle) -> Result<WorkingTreeState> {
        let git_repo = self.open_repo(repo)?;

        let mut status_options = StatusOptions::new();
        status_options.include_untracked(true);
        status_options.recurse_untracked_dirs(true);
        status_options.include_ignored(false);

        let statuses = git_repo
            .statuses(Some(&mut status_options))
            .context("Failed to get git status")?;

        let changed_paths = statuses
            .iter()
            .filter(|entry| !entry.status().is_ignored())
            .map(|entry| String::from_utf8_lossy(entry.path_bytes()).into_owned())
            .collect();
        Ok(WorkingTreeState::from_paths(changed_paths))
    }

    fn fetch_remote(&self, repo: &RepoHandle, remote: &str) -> Result<()> {
        let git_repo = self.open_repo(repo)?;

        let mut remote_obj = git_repo
            .find_remote(remote)
            .with_context(|| format!("Remote '{}' not found", remote))?;

        let cfg = git_repo.config().ok();
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(move |url, username_from_url, allowed| {
            if allowed.is_ssh_key()
                && let Some(user) = username_from_url
            {
                return git2::Cred::ssh_key_from_agent(user);
            }
            if allowed.is_user_pass_plaintext()
                && let Some(cfg) = &cfg
                && let Ok(cred) = git2::Cred::credential_helper(cfg, url, username_from_url)
            {
                return Ok(cred);
            }
            git2::Cred::default()
        });
        callbacks.transfer_progress(|progress| {
            debug!(
                "Received {}/{} objects",
                progress.received_objects(),
                progress.total_objects()
            );
            true
        });

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        remote_obj
            .fetch(&[] as &[&str], Some(&mut fetch_options), None)
            .context("Failed to fetch from remote")?;

        Ok(())
    }

    fn attempt_merge(
        &self,
        repo: &RepoHandle,
        target: &CommitId,
        options: MergeOptions,
    ) -> Result<MergeOutcome> {
        if options.commit {
            bail!("Only uncommitted merges are supported");
        }
        let git_repo = self.open_repo(repo)?;
        let annotated = git_repo
            .find_annotated_commit(to_oid(target)?)
            .with_context(|| format!("Commit {} not found", target))?;

        let (analysis, _) = git_repo
            .merge_analysis(&[&annotated])
            .context("Failed to analyse merge")?;
        if analysis.is_up_to_date() {
            debug!("{} is already contained in HEAD", target);
            return Ok(MergeOutcome::Untouched);
        }
        if options.fast_forward && analysis.is_fast_forward() {
            return Ok(MergeOutcome::Untouched);
        }

        let mut merge_options = git2::MergeOptions::new();
        merge_options.fail_on_conflict(false);
        let mut checkout = CheckoutBuilder::new();
        checkout.allow_conflicts(true).conflict_style_merge(true);

        git_repo
            .merge(&[&annotated], Some(&mut merge_options), Some(&mut checkout))
            .with_context(|| format!("Failed to merge {} into HEAD", target))?;

        let index = git_repo.index().context("Failed to read index")?;
        if !index.has_conflicts() {
            return Ok(MergeOutcome::Clean);
        }

        let mut conflicts = Vec::new();
        for conflict in index.conflicts().context("Failed to read conflicts")? {
            let conflict = conflict?;
            let kind = if conflict.our.is_some() && conflict.their.is_some() {
                "content"
            } else {
                "modify/delete"
            };
            let entry = conflict.our.or(conflict.their).or(conflict.ancestor);
            if let Some(entry) = entry {
                conflicts.push((String::from_utf8_lossy(&entry.path).into_owned(), kind));
            }
        }
        conflicts.sort();
        conflicts.dedup();

        Ok(MergeOutcome::Conflicts {
            output: conflict_output(&conflicts),
            files: conflicts.into_iter().map(|(path, _)| path).collect(),
        })
    }

    fn abort_merge(&self, repo: &RepoHandle) -> Result<()> {
        let git_repo = self.open_repo(repo)?;
        let head = git_repo
            .head()
            .and_then(|head| head.peel(ObjectType::Commit))
            .context("Failed to resolve HEAD")?;

        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        git_repo
            .reset(&head, ResetType::Hard, Some(&mut checkout))
            .context("Failed to reset index and working tree to HEAD")?;
        git_repo
            .cleanup_state()
            .context("Failed to clear merge state")?;
        Ok(())
    }

    fn merge_in_progress(&self, repo: &RepoHandle) -> Result<bool> {
        let git_repo = self.open_repo(repo)?;
        Ok(git_repo.state() != RepositoryState::Clean)
    }

    fn diff_refs(&self, repo: &RepoHandle, a: &CommitId, b: &CommitId) -> Result<String> {
        let git_repo = self.open_repo(repo)?;
        let tree_a = git_repo.find_commit(to_oid(a)?)?.tree()?;
        let tree_b = git_repo.find_commit(to_oid(b)?)?.tree()?;
        let diff = git_repo
            .diff_tree_to_tree(Some(&tree_a), Some(&tree_b), None)
            .with_context(|| format!("Failed to diff {}..{}", a.short(), b.short()))?;

        let mut text = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            if matches!(line.origin(), '+' | '-' | ' ') {
                text.push(line.origin());
            }
            text.push_str(&String::from_utf8_lossy(line.content()));
            true
        })
        .context("Failed to render diff")?;
        Ok(text)
    }
}
