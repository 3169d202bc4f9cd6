//! Checkout operations
//!
//! Switching the working tree to another commit, as done by branch checkout,
//! reset and fast-forward merges. Untracked files in the way are detected
//! before any change is made.

pub mod migration;
