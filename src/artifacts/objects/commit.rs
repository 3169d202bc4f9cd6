//! Commit object
//!
//! Commits are immutable nodes of the history graph. Each one carries the full
//! snapshot of tracked files (path to blob id), not a diff against its parent.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>            (zero, one or two lines)
//! timestamp <unix-seconds> <+zzzz>
//! file <blob-sha> <path>         (one line per tracked path, sorted by path)
//!
//! <commit message>
//! ```
//!
//! The id is the SHA-1 of the whole encoding, header included, so two commits
//! with the same parents, snapshot, message and timestamp are the same commit.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Tracked path to blob id
pub type Snapshot = BTreeMap<String, ObjectId>;

/// Environment variable overriding the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "TWIG_COMMIT_DATE";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Timestamp for a new commit
///
/// Reads `TWIG_COMMIT_DATE` (either `%Y-%m-%d %H:%M:%S %z` or RFC 2822) and
/// falls back to the current local time.
pub fn commit_timestamp() -> DateTime<FixedOffset> {
    std::env::var(COMMIT_DATE_ENV)
        .ok()
        .and_then(|date_str| {
            DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| DateTime::parse_from_str(&date_str, TIMESTAMP_FORMAT))
                .ok()
        })
        .unwrap_or_else(|| chrono::Local::now().fixed_offset())
}

/// The fixed timestamp of every root commit
pub fn epoch() -> DateTime<FixedOffset> {
    DateTime::<Utc>::UNIX_EPOCH.fixed_offset()
}

/// Slim representation of a commit
///
/// Only what graph walks need: the id and the parent ids.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
}

/// Commit object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for the root, two for merge commits)
    parents: Vec<ObjectId>,
    /// Every tracked path at this point in history
    snapshot: Snapshot,
    message: String,
    timestamp: DateTime<FixedOffset>,
}

impl Commit {
    /// The parentless, empty commit every store starts from
    pub fn root(message: impl Into<String>) -> Self {
        Commit {
            parents: vec![],
            snapshot: Snapshot::new(),
            message: message.into(),
            timestamp: epoch(),
        }
    }

    /// A commit on top of `parent`, starting from the parent's snapshot
    pub fn child(
        parent_oid: ObjectId,
        parent: &Commit,
        message: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Commit {
            parents: vec![parent_oid],
            snapshot: parent.snapshot.clone(),
            message: message.into(),
            timestamp,
        }
    }

    /// A two-parent commit whose starting snapshot is taken from the first parent
    pub fn merge(
        first_oid: ObjectId,
        first: &Commit,
        second_oid: ObjectId,
        message: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Commit {
            parents: vec![first_oid, second_oid],
            snapshot: first.snapshot.clone(),
            message: message.into(),
            timestamp,
        }
    }

    pub(crate) fn track(&mut self, path: String, blob_oid: ObjectId) {
        self.snapshot.insert(path, blob_oid);
    }

    pub(crate) fn untrack(&mut self, path: &str) {
        self.snapshot.remove(path);
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// First parent, followed by `log`
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn tracked_oid(&self, path: &str) -> Option<&ObjectId> {
        self.snapshot.get(path)
    }

    pub fn tracks(&self, path: &str) -> bool {
        self.snapshot.contains_key(path)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Thu Jan 01 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format("%a %b %d %H:%M:%S %Y %z").to_string()
    }

    pub fn to_slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            parents: self.parents.clone(),
        }
    }

    fn headers(&self) -> Vec<String> {
        let mut lines = vec![];

        for parent in &self.parents {
            lines.push(format!("parent {}", parent));
        }
        lines.push(format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for (path, blob_oid) in &self.snapshot {
            lines.push(format!("file {} {}", blob_oid, path));
        }

        lines
    }
}

fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, timezone) = value
        .split_once(' ')
        .context("Invalid commit object: malformed timestamp")?;
    let seconds = seconds
        .parse::<i64>()
        .context("Invalid commit object: timestamp is not a number")?;
    let offset = *DateTime::parse_from_str(
        &format!("1970-01-01 00:00:00 {timezone}"),
        TIMESTAMP_FORMAT,
    )
    .context("Invalid commit object: malformed timezone")?
    .offset();

    DateTime::from_timestamp(seconds, 0)
        .map(|utc| utc.with_timezone(&offset))
        .context("Invalid commit object: timestamp out of range")
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();
        content_bytes.write_all(self.headers().join("\n").as_bytes())?;
        content_bytes.write_all(b"\n\n")?;
        content_bytes.write_all(self.message.as_bytes())?;

        Ok(Bytes::from(self.object_type().frame(&content_bytes)))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let (object_type, length) = ObjectType::read_frame(&mut reader)?;
        if object_type != ObjectType::Commit {
            anyhow::bail!("Invalid commit object: found a {} object", object_type);
        }

        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        if content.len() != length {
            anyhow::bail!("Invalid commit object: expected {length} bytes, found {}", content.len());
        }
        let content = String::from_utf8(content)?;

        let (headers, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut parents = Vec::new();
        let mut snapshot = Snapshot::new();
        let mut timestamp = None;

        for line in headers.lines() {
            let (key, value) = line
                .split_once(' ')
                .context("Invalid commit object: malformed header line")?;

            match key {
                "parent" => parents.push(ObjectId::try_parse(value.to_string())?),
                "timestamp" => timestamp = Some(parse_timestamp(value)?),
                "file" => {
                    let (blob_oid, path) = value
                        .split_once(' ')
                        .context("Invalid commit object: malformed file line")?;
                    snapshot.insert(path.to_string(), ObjectId::try_parse(blob_oid.to_string())?);
                }
                _ => anyhow::bail!("Invalid commit object: unknown header {key:?}"),
            }
        }

        Ok(Commit {
            parents,
            snapshot,
            message: message.to_string(),
            timestamp: timestamp.context("Invalid commit object: missing timestamp line")?,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
