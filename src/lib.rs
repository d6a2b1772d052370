//! GitPilot application library
//!
//! Wires the git2 adapter, configuration and rendering around the
//! analyzer from `gitpilot-core`. Exposed as a library for integration tests.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
