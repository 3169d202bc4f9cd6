use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, commit_timestamp};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;

impl Repository {
    /// Record the staged changes on top of the current branch
    pub fn commit(&self, message: &str) -> anyhow::Result<ObjectId> {
        if message.trim().is_empty() {
            return Err(TwigError::EmptyMessage.into());
        }
        if self.index().is_empty()? {
            return Err(TwigError::NothingStaged.into());
        }

        let (head_oid, head) = self.head_commit()?;
        let commit = Commit::child(head_oid, &head, message, commit_timestamp());
        let commit_oid = self.write_commit(commit)?;

        let current = self.refs().current_branch()?;
        self.refs().move_branch(&current, &commit_oid)?;

        Ok(commit_oid)
    }
}
