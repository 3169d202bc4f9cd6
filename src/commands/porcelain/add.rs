use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::Object;
use crate::errors::TwigError;

impl Repository {
    /// Stage a working file for the next commit
    ///
    /// Content identical to what the current commit tracks is not staged, and
    /// any earlier staging of the path is dropped.
    pub fn add(&self, path: &str) -> anyhow::Result<()> {
        if !Workspace::is_trackable(path) {
            return Err(TwigError::FileNotFound.into());
        }

        let blob = self
            .workspace()
            .parse_blob(path)?
            .ok_or(TwigError::FileNotFound)?;

        self.index().unstage_remove(path)?;

        let (_, head) = self.head_commit()?;
        if head.tracked_oid(path) == Some(&blob.object_id()?) {
            self.index().unstage_add(path)?;
            tracing::debug!(path, "content matches the current commit, not staged");
        } else {
            self.index().stage_add(path, blob.content())?;
        }

        Ok(())
    }
}
