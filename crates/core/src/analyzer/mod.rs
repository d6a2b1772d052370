//! The analyzer drives a [`GitPort`] to answer the questions this tool asks:
//! where does a branch stand against its remote, what does that mean, and
//! would a merge conflict.
//!
//! Its methods are split across files by concern, the same way the domain
//! is: resolving refs, counting divergence, walking history, probing a merge,
//! sweeping every branch and assembling the single-branch report.

mod divergence;
mod history;
mod probe;
mod report;
mod resolve;
mod sweep;

#[cfg(test)]
pub(crate) mod fake;

pub use report::ReportOptions;

use crate::domain::RepoHandle;
use crate::error::{CoreError, Result};
use crate::ports::GitPort;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Default remote consulted first when a branch exists on several
pub const DEFAULT_REMOTE: &str = "origin";

/// Analysis context bound to one opened repository
pub struct Analyzer {
    git: Arc<dyn GitPort>,
    repo: RepoHandle,
    preferred_remote: String,
}

impl Analyzer {
    pub fn new(git: Arc<dyn GitPort>, repo: RepoHandle) -> Self {
        Self {
            git,
            repo,
            preferred_remote: DEFAULT_REMOTE.to_string(),
        }
    }

    /// Open the repository at `path` through the port
    pub fn open(git: Arc<dyn GitPort>, path: &Path) -> Result<Self> {
        let repo = git
            .open_repository(path)
            .map_err(|source| CoreError::NotARepository {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Opened repository at {}", repo.path.display());
        Ok(Self::new(git, repo))
    }

    pub fn with_preferred_remote(mut self, remote: impl Into<String>) -> Self {
        self.preferred_remote = remote.into();
        self
    }
}
