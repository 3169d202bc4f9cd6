use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;

impl Repository {
    /// Overwrite one working file with its content in a commit
    ///
    /// Uses the current commit unless `commit` names another one by full or
    /// abbreviated id. The staging area is left alone.
    pub fn checkout_file(&self, commit: Option<&str>, path: &str) -> anyhow::Result<()> {
        let commit_oid = match commit {
            Some(prefix) => self.database().find_commit(prefix)?,
            None => self.head_oid()?,
        };
        let commit = self.database().load_commit(&commit_oid)?;

        let blob_oid = commit
            .tracked_oid(path)
            .filter(|_| Workspace::is_trackable(path))
            .ok_or(TwigError::FileNotInCommit)?;
        let blob = self.database().load_blob(blob_oid)?;

        self.workspace().write_file(path, blob.content())
    }

    /// Switch to another branch, restoring its head in the working tree
    pub fn checkout_branch(&self, name: &str) -> anyhow::Result<()> {
        let target = BranchName::try_parse(name)
            .ok()
            .filter(|branch| self.refs().branch_exists(branch))
            .ok_or(TwigError::NoSuchBranch)?;

        if self.refs().is_current_branch(&target)? {
            return Err(TwigError::AlreadyOnBranch.into());
        }

        let target_oid = self
            .refs()
            .read_branch(&target)?
            .ok_or(TwigError::NoSuchBranch)?;

        self.restore(&target_oid)?;
        self.refs().set_current(&target)?;

        tracing::info!(branch = %target, oid = %target_oid, "switched branch");
        Ok(())
    }

    /// Make the working tree match a commit and clear the staging area
    ///
    /// Fails before touching anything if an untracked file is in the way.
    /// The current branch does not move.
    pub(crate) fn restore(&self, target_oid: &ObjectId) -> anyhow::Result<()> {
        let (_, current) = self.head_commit()?;
        let target = self.database().load_commit(target_oid)?;

        Migration::new(self, current.snapshot(), target.snapshot()).apply_changes()
    }
}
