//! Commit history traversal and formatting
//!
//! - `rev_list`: first-parent walk from a commit to the root
//!
//! Every listed commit is rendered as one [`LogEntry`]:
//!
//! ```text
//! ===
//! commit <id>
//! Merge: <first-parent[..7]> <second-parent[..7]>    (merge commits only)
//! Date: Thu Jan 01 00:00:00 1970 +0000
//! <message>
//!
//! ```

pub mod rev_list;

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use derive_new::new;

#[derive(new)]
pub struct LogEntry<'c> {
    oid: &'c ObjectId,
    commit: &'c Commit,
    colorize: bool,
}

impl std::fmt::Display for LogEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header = format!("commit {}", self.oid);

        writeln!(f, "===")?;
        if self.colorize {
            writeln!(f, "{}", header.yellow())?;
        } else {
            writeln!(f, "{}", header)?;
        }

        if self.commit.is_merge() {
            let parents = self
                .commit
                .parents()
                .iter()
                .map(ObjectId::to_short_oid)
                .collect::<Vec<_>>();
            writeln!(f, "Merge: {}", parents.join(" "))?;
        }

        writeln!(f, "Date: {}", self.commit.readable_timestamp())?;
        writeln!(f, "{}", self.commit.message())?;
        writeln!(f)
    }
}
