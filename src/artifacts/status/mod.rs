//! Working tree status inspection
//!
//! Compares the working tree against the staging area and the current commit.
//!
//! ## Components
//!
//! - `file_change`: Kinds of unstaged modification
//! - `status_info`: Collection of every status section

pub mod file_change;
pub mod status_info;
