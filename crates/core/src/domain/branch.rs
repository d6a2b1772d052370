use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Opaque commit identifier as handed out by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(pub String);

impl CommitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Abbreviated form for display
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opened repository.
///
/// Every port call takes the handle explicitly, so several repositories can
/// be analysed side by side without shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoHandle {
    pub path: PathBuf,
}

impl RepoHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// A remote-tracking ref that mirrors a local branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRef {
    pub remote: String,
    pub ref_name: String,
    pub commit: CommitId,
}

impl TrackingRef {
    /// Conventional name of the tracking ref for `branch` on `remote`
    pub fn ref_name_for(remote: &str, branch: &str) -> String {
        format!("refs/remotes/{}/{}", remote, branch)
    }
}

/// A local branch and, when one exists, its remote counterpart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    pub name: String,
    pub local_commit: CommitId,
    pub remote: Option<TrackingRef>,
}

impl BranchRef {
    pub fn remote_commit(&self) -> Option<&CommitId> {
        self.remote.as_ref().map(|r| &r.commit)
    }

    pub fn local_ref_name(&self) -> String {
        format!("refs/heads/{}", self.name)
    }
}
