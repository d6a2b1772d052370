use super::{
    branch::{BranchRef, CommitId, TrackingRef},
    commit::CommitSummary,
    conflict::ConflictReport,
    divergence::{DivergenceResult, Verdict},
    worktree::WorkingTreeState,
};
use serde::{Deserialize, Serialize};

/// How one branch fared in a sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SweepOutcome {
    /// No remote-tracking ref exists for the branch
    RemoteAbsent,
    Compared {
        remote: TrackingRef,
        divergence: DivergenceResult,
        verdict: Verdict,
    },
    /// Analysing this branch failed; the rest of the sweep carried on
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepEntry {
    pub branch: String,
    pub local_commit: CommitId,
    #[serde(flatten)]
    pub outcome: SweepOutcome,
    /// Absent only when the status check itself failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_tree: Option<WorkingTreeState>,
}

impl SweepEntry {
    pub fn divergence(&self) -> Option<DivergenceResult> {
        match &self.outcome {
            SweepOutcome::Compared { divergence, .. } => Some(*divergence),
            _ => None,
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match &self.outcome {
            SweepOutcome::Compared { verdict, .. } => Some(*verdict),
            _ => None,
        }
    }
}

/// Every local branch, in backend enumeration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub fetched_remotes: Vec<String>,
    pub entries: Vec<SweepEntry>,
}

impl SweepReport {
    pub fn entry(&self, branch: &str) -> Option<&SweepEntry> {
        self.entries.iter().find(|e| e.branch == branch)
    }
}

/// Comparison of a branch against one configured remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStatus {
    pub remote: String,
    /// None when the remote has no branch of that name
    pub tracking: Option<TrackingRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divergence: Option<DivergenceResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// Whether the dry-run merge ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "probe", rename_all = "snake_case")]
pub enum ProbeResult {
    Completed(ConflictReport),
    Skipped { reason: String },
}

impl ProbeResult {
    pub fn report(&self) -> Option<&ConflictReport> {
        match self {
            ProbeResult::Completed(report) => Some(report),
            ProbeResult::Skipped { .. } => None,
        }
    }
}

/// Single-branch deep report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchReport {
    pub branch: BranchRef,
    pub current_branch: Option<String>,
    pub history: Vec<CommitSummary>,
    /// True when the history was cut at the configured limit
    pub history_truncated: bool,
    pub remotes: Vec<RemoteStatus>,
    pub working_tree: WorkingTreeState,
    pub probe: ProbeResult,
}
