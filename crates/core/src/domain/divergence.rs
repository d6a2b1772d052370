use serde::{Deserialize, Serialize};

/// Commits exclusive to each side of a local/remote comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivergenceResult {
    pub ahead: usize,
    pub behind: usize,
}

impl DivergenceResult {
    pub fn new(ahead: usize, behind: usize) -> Self {
        Self { ahead, behind }
    }

    /// The same comparison seen from the other side
    pub fn swapped(self) -> Self {
        Self {
            ahead: self.behind,
            behind: self.ahead,
        }
    }

    pub fn verdict(&self) -> Verdict {
        classify(self.ahead, self.behind)
    }
}

/// What a branch needs to get back in sync with its remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    UpToDate,
    PushNeeded,
    PullNeeded,
    MergeNeeded,
}

impl Verdict {
    /// Whether acting on the verdict rewrites the working tree
    pub fn touches_working_tree(&self) -> bool {
        matches!(self, Verdict::PullNeeded | Verdict::MergeNeeded)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Verdict::UpToDate => write!(f, "up to date"),
            Verdict::PushNeeded => write!(f, "push needed"),
            Verdict::PullNeeded => write!(f, "pull needed"),
            Verdict::MergeNeeded => write!(f, "merge needed"),
        }
    }
}

/// Map ahead/behind counts to a verdict. Total over all inputs.
pub fn classify(ahead: usize, behind: usize) -> Verdict {
    match (ahead > 0, behind > 0) {
        (false, false) => Verdict::UpToDate,
        (true, false) => Verdict::PushNeeded,
        (false, true) => Verdict::PullNeeded,
        (true, true) => Verdict::MergeNeeded,
    }
}
