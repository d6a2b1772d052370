#![allow(dead_code)]

use anyhow::Result;
use git2::{Repository, RepositoryInitOptions, Signature, build::CheckoutBuilder};
use gitpilot::adapters::git::GitAdapter;
use gitpilot_core::{Analyzer, CommitId};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use walkdir::WalkDir;

/// A working clone wired to a bare "origin" inside one temp directory
pub struct Fixture {
    pub repo: Repository,
    pub remote_path: PathBuf,
    pub temp_dir: TempDir,
}

impl Fixture {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let remote_path = temp_dir.path().join("remote.git");
        init_bare(&remote_path)?;
        let work_path = temp_dir.path().join("work");
        let repo = init_repo(&work_path)?;
        repo.remote("origin", &remote_path.to_string_lossy())?;

        let fixture = Self {
            repo,
            remote_path,
            temp_dir,
        };
        fixture.commit_file("README.md", "# project\n", "Initial commit")?;
        fixture.push("main")?;
        Ok(fixture)
    }

    pub fn workdir(&self) -> &Path {
        self.repo.workdir().expect("fixture repo has a working tree")
    }

    pub fn analyzer(&self) -> Result<Analyzer> {
        Ok(Analyzer::open(Arc::new(GitAdapter::new()), self.workdir())?)
    }

    /// Add a second bare remote under `name`
    pub fn add_remote(&self, name: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(format!("{}.git", name));
        init_bare(&path)?;
        self.repo.remote(name, &path.to_string_lossy())?;
        Ok(path)
    }

    /// Write, stage and commit one file on the checked-out branch
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> Result<CommitId> {
        fs::write(self.workdir().join(name), content)?;
        let mut index = self.repo.index()?;
        index.add_path(Path::new(name))?;
        index.write()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = Signature::now("Test User", "test@example.com")?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        Ok(CommitId::new(oid.to_string()))
    }

    pub fn push(&self, branch: &str) -> Result<()> {
        self.push_to("origin", branch)
    }

    /// Force-push `branch` to `remote`, then refresh the tracking ref
    pub fn push_to(&self, remote: &str, branch: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote)?;
        remote.push(&[format!("+refs/heads/{0}:refs/heads/{0}", branch)], None)?;
        remote.fetch(&[] as &[&str], None, None)?;
        Ok(())
    }

    pub fn checkout_new(&self, branch: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.branch(branch, &head, false)?;
        self.checkout(branch)
    }

    pub fn checkout(&self, branch: &str) -> Result<()> {
        self.repo.set_head(&format!("refs/heads/{}", branch))?;
        self.repo.checkout_head(Some(CheckoutBuilder::new().force()))?;
        Ok(())
    }

    /// Move the checked-out branch back to `commit`, discarding the rest
    pub fn reset_hard(&self, commit: &CommitId) -> Result<()> {
        let object = self.repo.revparse_single(&commit.0)?;
        self.repo
            .reset(&object, git2::ResetType::Hard, Some(CheckoutBuilder::new().force()))?;
        Ok(())
    }

    /// Every file under the working tree (outside .git) with its content
    pub fn snapshot(&self) -> Result<BTreeMap<PathBuf, Vec<u8>>> {
        let root = self.workdir();
        let mut files = BTreeMap::new();
        for entry in WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git")
        {
            let entry = entry?;
            if entry.file_type().is_file() {
                let path = entry.path();
                files.insert(path.strip_prefix(root)?.to_path_buf(), fs::read(path)?);
            }
        }
        Ok(files)
    }
}

fn init_repo(path: &Path) -> Result<Repository> {
    let mut options = RepositoryInitOptions::new();
    options.initial_head("main");
    let repo = Repository::init_opts(path, &options)?;
    let mut config = repo.config()?;
    config.set_str("user.name", "Test User")?;
    config.set_str("user.email", "test@example.com")?;
    Ok(repo)
}

fn init_bare(path: &Path) -> Result<Repository> {
    let mut options = RepositoryInitOptions::new();
    options.bare(true).initial_head("main");
    Ok(Repository::init_opts(path, &options)?)
}
