//! twig: a single-user, local-first version-control engine
//!
//! The crate is split the same way the on-disk store is:
//!
//! - `areas`: the persisted parts of a store (object database, refs, index,
//!   remotes, workspace) and the `Repository` context tying them together
//! - `artifacts`: value types and algorithms (objects, blob index, ancestry,
//!   merge resolution, checkout migrations, sync planning)
//! - `commands`: user-facing operations implemented on `Repository`
//! - `errors`: user-facing failure taxonomy

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
