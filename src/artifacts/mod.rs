//! Data structures and algorithms
//!
//! - `branch`: Branch and remote names
//! - `checkout`: Working tree migration between snapshots
//! - `core`: Shared utilities (pager wrapper, atomic writes)
//! - `database`: Blob index hash table
//! - `log`: First-parent history walk and log entries
//! - `merge`: Split point discovery and per-path merge resolution
//! - `objects`: Object types (blob, commit)
//! - `status`: Working tree status inspection
//! - `sync`: Commit and blob exchange between stores

pub mod branch;
pub mod checkout;
pub mod core;
pub mod database;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
pub mod sync;
