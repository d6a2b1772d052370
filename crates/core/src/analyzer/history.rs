use super::Analyzer;
use crate::domain::{CommitId, CommitSummary};
use crate::error::{CoreError, Result};
use crate::ports::CommitIter;

impl Analyzer {
    /// Lazy history from `from`. Every call starts its own traversal.
    pub fn history(&self, from: &CommitId) -> Result<CommitIter> {
        self.git
            .commits_reachable_from(&self.repo, from)
            .map_err(CoreError::backend("walk history", from.to_string()))
    }

    /// At most `limit` commits of history (0 = no limit), plus whether more
    /// were left unread
    pub fn history_page(&self, from: &CommitId, limit: usize) -> Result<(Vec<CommitSummary>, bool)> {
        let walk = self.history(from)?;
        let mut commits = Vec::new();
        for commit in walk {
            if limit > 0 && commits.len() == limit {
                return Ok((commits, true));
            }
            commits.push(commit.map_err(CoreError::backend("read commit", from.to_string()))?);
        }
        Ok((commits, false))
    }
}
