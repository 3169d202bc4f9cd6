//! Three-way merge support
//!
//! - `split_finder`: ancestor walks and split point discovery
//! - `resolution`: per-path classification and conflict blocks

pub mod resolution;
pub mod split_finder;

/// How a merge ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The other branch is already contained in the current one
    AlreadyAncestor,
    /// The current branch moved forward to the other head; no commit was made
    FastForwarded,
    /// A merge commit was made, possibly with conflict blocks in it
    Merged { conflicted: bool },
}

impl MergeOutcome {
    /// Line reported to the user, if any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            MergeOutcome::AlreadyAncestor => Some("Given branch is an ancestor of the current branch."),
            MergeOutcome::FastForwarded => Some("Current branch fast-forwarded."),
            MergeOutcome::Merged { conflicted: true } => Some("Encountered a merge conflict."),
            MergeOutcome::Merged { conflicted: false } => None,
        }
    }
}
