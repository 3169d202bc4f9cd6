//! Plumbing operations
//!
//! Building blocks shared by the porcelain commands.
//!
//! - `write_commit`: Finalize a commit against the staging area and store it

mod write_commit;
