use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, RemoteName};
use crate::artifacts::sync::{Transfer, closure, open_remote};
use crate::errors::TwigError;

impl Repository {
    /// Bring a remote branch's history into this store
    ///
    /// The remote head lands on the local branch `<remote>/<branch>`, created
    /// or moved as needed. A local branch named `<remote>` leaves no room for
    /// it, and nothing is fetched.
    ///
    /// # Returns
    ///
    /// The name of that tracking branch
    pub fn fetch(&self, remote_name: &str, branch_name: &str) -> anyhow::Result<BranchName> {
        let remote_name = RemoteName::try_parse(remote_name).map_err(|_| TwigError::RemoteNotFound)?;
        let remote = open_remote(self, &remote_name)?;

        let branch =
            BranchName::try_parse(branch_name).map_err(|_| TwigError::RemoteBranchNotFound)?;
        let remote_head = remote
            .refs()
            .read_branch(&branch)?
            .ok_or(TwigError::RemoteBranchNotFound)?;

        let tracking = BranchName::tracking(&remote_name, &branch);
        if self.refs().clashes(&tracking) {
            return Err(TwigError::BranchAlreadyExists.into());
        }

        let known = closure(self, &self.head_oid()?)?.into_iter().collect();
        let transfer = Transfer::new(&remote, self);
        let missing = transfer.missing_commits(&remote_head, &known)?;
        transfer.copy_commits(&missing)?;

        self.refs().move_branch(&tracking, &remote_head)?;

        tracing::info!(remote = %remote_name, branch = %branch, head = %remote_head, "fetched");
        Ok(tracking)
    }
}
