pub mod branch;
pub mod commit;
pub mod conflict;
pub mod divergence;
pub mod report;
pub mod worktree;

// Re-exports for convenience
pub use branch::*;
pub use commit::*;
pub use conflict::*;
pub use divergence::*;
pub use report::*;
pub use worktree::*;
