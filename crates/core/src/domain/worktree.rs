use super::divergence::Verdict;
use serde::{Deserialize, Serialize};

/// Snapshot of uncommitted changes, taken fresh on every check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingTreeState {
    pub is_dirty: bool,
    /// Modified, staged and untracked paths. Ignored files are not listed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changed_paths: Vec<String>,
}

impl WorkingTreeState {
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn from_paths(changed_paths: Vec<String>) -> Self {
        Self {
            is_dirty: !changed_paths.is_empty(),
            changed_paths,
        }
    }

    /// A dirty tree blocks pull and merge, whatever the verdict says otherwise
    pub fn blocks(&self, verdict: Verdict) -> bool {
        self.is_dirty && verdict.touches_working_tree()
    }
}
