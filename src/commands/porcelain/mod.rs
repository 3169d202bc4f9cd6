//! Porcelain commands (user-facing operations)
//!
//! Each command is an `impl Repository` block. Output meant for the user goes
//! through the repository's writer; user-facing failures are returned as
//! [`TwigError`](crate::errors::TwigError) values.
//!
//! ## Commands
//!
//! - `init`: Create a store with its root commit
//! - `add`, `rm`: Stage additions and removals
//! - `commit`: Record the staged changes
//! - `checkout`: Restore files or switch branches
//! - `reset`: Move the current branch to a commit
//! - `log`: Show history, all commits, or commits by message
//! - `status`: Show branches, staged changes and working tree changes
//! - `branch`: Create and delete branches
//! - `merge`: Three-way merge of another branch
//! - `remote`: Record and forget remote stores
//! - `push`, `fetch`, `pull`: Exchange history with a remote store

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod fetch;
pub mod init;
pub mod log;
pub mod merge;
pub mod pull;
pub mod push;
pub mod remote;
pub mod reset;
pub mod rm;
pub mod status;
