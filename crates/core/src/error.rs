use std::path::PathBuf;
use thiserror::Error;

/// Core analysis errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Not a git repository: {}", path.display())]
    NotARepository { path: PathBuf, source: anyhow::Error },

    #[error("Branch '{name}' not found in local branches")]
    BranchNotFound { name: String },

    #[error("Failed to fetch from remote '{remote}'")]
    Network { remote: String, source: anyhow::Error },

    #[error(
        "Failed to roll back dry-run merge of {target}; the repository may be left mid-merge \
         (run 'git merge --abort' and inspect 'git status')"
    )]
    AbortFailed { target: String, source: anyhow::Error },

    #[error("Precondition failed: {reason}")]
    PreconditionFailed { reason: String },

    #[error("Failed to {operation} ({target})")]
    Backend {
        operation: &'static str,
        target: String,
        source: anyhow::Error,
    },
}

impl CoreError {
    pub(crate) fn backend(
        operation: &'static str,
        target: impl Into<String>,
    ) -> impl FnOnce(anyhow::Error) -> CoreError {
        let target = target.into();
        move |source| CoreError::Backend {
            operation,
            target,
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// The message followed by every underlying cause, colon separated
    pub fn describe(&self) -> String {
        let mut text = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            text.push_str(": ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        text
    }
}
