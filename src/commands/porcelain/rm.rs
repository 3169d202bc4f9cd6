use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The path was only staged for addition and is no longer
    Unstaged,
    /// The path is staged for removal and gone from the working tree
    Removed,
    /// The path was neither staged nor tracked
    NoReasonToRemove,
}

impl Repository {
    /// Unstage a path, and stage its removal if the current commit tracks it
    pub fn rm(&self, path: &str) -> anyhow::Result<RemoveOutcome> {
        if !Workspace::is_trackable(path) {
            writeln!(self.writer(), "No reason to remove the file.")?;
            return Ok(RemoveOutcome::NoReasonToRemove);
        }

        let was_staged = self.index().unstage_add(path)?;

        let (_, head) = self.head_commit()?;
        if let Some(blob_oid) = head.tracked_oid(path) {
            let blob = self.database().load_blob(blob_oid)?;
            self.index().stage_remove(path, blob.content())?;
            self.workspace().remove_file(path)?;

            return Ok(RemoveOutcome::Removed);
        }

        if was_staged {
            Ok(RemoveOutcome::Unstaged)
        } else {
            writeln!(self.writer(), "No reason to remove the file.")?;
            Ok(RemoveOutcome::NoReasonToRemove)
        }
    }
}
