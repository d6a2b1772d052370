pub mod git;

// Re-exports
pub use git::*;
