//! Core store components
//!
//! - `database`: Object store for blobs and commits, with the blob index
//! - `index`: Staging area for additions and removals
//! - `refs`: Branch references and HEAD
//! - `remotes`: Named locations of other stores
//! - `repository`: Store layout and coordination of the other areas
//! - `workspace`: Working tree file operations

pub mod database;
pub mod index;
pub mod refs;
pub mod remotes;
pub mod repository;
pub mod workspace;
