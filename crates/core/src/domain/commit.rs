use super::branch::CommitId;
use serde::{Deserialize, Serialize};

/// Snapshot of one commit in a history listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub id: CommitId,
    pub author: Author,
    pub message: String,
    pub timestamp: Timestamp,
}

/// Commit author information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// Commit timestamp (Unix timestamp with timezone offset in minutes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub offset_minutes: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, offset_minutes: i32) -> Self {
        Self {
            seconds,
            offset_minutes,
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Raw epoch seconds; shown when the offset cannot be rendered as a date
        write!(f, "{}", self.seconds)
    }
}
