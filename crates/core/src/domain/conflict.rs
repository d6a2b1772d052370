use super::branch::CommitId;
use serde::{Deserialize, Serialize};

/// Merge policy handed to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    pub commit: bool,
    pub fast_forward: bool,
}

impl MergeOptions {
    /// No merge commit and no fast-forward, so textual conflicts always surface
    pub const DRY_RUN: MergeOptions = MergeOptions {
        commit: false,
        fast_forward: false,
    };
}

/// What the backend saw when it attempted a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Nothing to merge; index and working tree were not touched
    Untouched,
    Clean,
    Conflicts { files: Vec<String>, output: String },
}

/// Result of a dry-run merge. The repository has already been restored
/// by the time a caller sees one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub target: CommitId,
    pub has_conflicts: bool,
    pub raw_output: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicting_files: Vec<String>,
}

impl ConflictReport {
    pub fn from_outcome(target: CommitId, outcome: MergeOutcome) -> Self {
        match outcome {
            MergeOutcome::Untouched | MergeOutcome::Clean => Self {
                target,
                has_conflicts: false,
                raw_output: String::new(),
                conflicting_files: Vec::new(),
            },
            MergeOutcome::Conflicts { files, output } => Self {
                target,
                has_conflicts: true,
                raw_output: output,
                conflicting_files: files,
            },
        }
    }
}
