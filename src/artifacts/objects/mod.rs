//! Stored object types
//!
//! Everything the store persists by content is an object identified by the
//! SHA-1 of its serialized form:
//!
//! - **Blob**: raw file content, hashed over the bytes themselves
//! - **Commit**: parents, snapshot, message and timestamp, hashed over the
//!   `commit <size>\0<content>` encoding

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated form used in log and merge output
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
