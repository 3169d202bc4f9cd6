use crate::areas::repository::Repository;
use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::errors::TwigError;
use anyhow::Context;
use std::fs;

/// Message of the root commit every store starts from
pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        if self.layout().is_initialized() {
            return Err(TwigError::AlreadyInitialized.into());
        }

        for dir in self.layout().directories() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {} directory", dir.display()))?;
        }
        self.database()
            .write_blob_index()
            .context("Failed to create the blob index")?;

        let root_oid = self.database().store_commit(&Commit::root(ROOT_COMMIT_MESSAGE))?;

        let master = BranchName::try_parse(DEFAULT_BRANCH)?;
        self.refs().move_branch(&master, &root_oid)?;
        self.refs()
            .set_current(&master)
            .context("Failed to create initial HEAD reference")?;

        tracing::info!(store = %self.layout().store().display(), root = %root_oid, "initialized store");
        Ok(())
    }
}
