//! Command implementations
//!
//! - `plumbing`: Low-level building blocks (commit finalization)
//! - `porcelain`: User-facing commands (add, commit, merge, push, etc.)

pub mod plumbing;
pub mod porcelain;
