use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Finalize `commit` against the staging area and store it
    ///
    /// Every staged addition is stored as a blob and tracked; every staged
    /// removal is stored too, preserving its content, and untracked. Entries
    /// are cleared as they are applied. No branch moves.
    pub fn write_commit(&self, mut commit: Commit) -> anyhow::Result<ObjectId> {
        for path in self.index().staged_for_add()? {
            let blob = Blob::new(self.index().read_staged(&path)?);
            let blob_oid = self.database().store_blob(&blob)?;

            commit.track(path.clone(), blob_oid);
            self.index().unstage_add(&path)?;
        }

        for path in self.index().staged_for_remove()? {
            let blob = Blob::new(self.index().read_removed(&path)?);
            self.database().store_blob(&blob)?;

            commit.untrack(&path);
            self.index().unstage_remove(&path)?;
        }

        let commit_oid = self.database().store_commit(&commit)?;
        tracing::info!(oid = %commit_oid, tracked = commit.snapshot().len(), "wrote commit");

        Ok(commit_oid)
    }
}
