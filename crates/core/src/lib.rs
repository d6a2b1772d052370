//! GitPilot Core - branch health and merge probing with no git library attached
//!
//! This crate contains the domain types, the git port (the capability
//! interface a backend must provide) and the analyzer that turns backend
//! answers into divergence counts, verdicts and conflict reports. Talking to
//! an actual repository is the job of an adapter.

pub mod analyzer;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports for ergonomics
pub use analyzer::Analyzer;
pub use domain::*;
pub use error::*;
