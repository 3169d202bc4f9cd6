use crate::areas::repository::Repository;

impl Repository {
    /// Move the current branch to a commit, restoring it in the working tree
    pub fn reset(&self, commit: &str) -> anyhow::Result<()> {
        let target_oid = self.database().find_commit(commit)?;

        self.restore(&target_oid)?;

        let current = self.refs().current_branch()?;
        self.refs().move_branch(&current, &target_oid)?;

        Ok(())
    }
}
