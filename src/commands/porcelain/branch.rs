use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;

impl Repository {
    /// Create a branch at the current commit; the current branch does not change
    pub fn branch(&self, branch_name: &str) -> anyhow::Result<ObjectId> {
        let branch_name = BranchName::try_parse(branch_name)?;
        let head_oid = self.head_oid()?;

        self.refs().create_branch(&branch_name, &head_oid)?;

        Ok(head_oid)
    }

    /// Delete a branch pointer; its commits stay in the store
    pub fn rm_branch(&self, branch_name: &str) -> anyhow::Result<ObjectId> {
        let branch_name =
            BranchName::try_parse(branch_name).map_err(|_| TwigError::BranchNotFound)?;

        self.refs().delete_branch(&branch_name)
    }
}
