use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, RemoteName};
use crate::artifacts::merge::split_finder::SplitFinder;
use crate::artifacts::sync::{Transfer, closure, open_remote};
use crate::errors::TwigError;
use std::collections::HashSet;

impl Repository {
    /// Send the current branch's history to a branch of a remote store
    ///
    /// The remote branch must be an ancestor of the current head; otherwise
    /// nothing in the remote store is touched.
    pub fn push(&self, remote_name: &str, branch_name: &str) -> anyhow::Result<()> {
        let remote_name = RemoteName::try_parse(remote_name).map_err(|_| TwigError::RemoteNotFound)?;
        let branch = BranchName::try_parse(branch_name)?;
        let remote = open_remote(self, &remote_name)?;

        if remote.refs().clashes(&branch) {
            return Err(TwigError::BranchAlreadyExists.into());
        }

        let head_oid = self.head_oid()?;
        let known = match remote.refs().read_branch(&branch)? {
            None => HashSet::new(),
            Some(remote_head) => {
                let finder = SplitFinder::new(|oid| self.database().load_slim_commit(oid));
                if !self.database().contains_commit(&remote_head)
                    || !finder.is_ancestor(&remote_head, &head_oid)?
                {
                    return Err(TwigError::RejectNonFastForward.into());
                }
                closure(self, &remote_head)?.into_iter().collect()
            }
        };

        let transfer = Transfer::new(self, &remote);
        let missing = transfer.missing_commits(&head_oid, &known)?;
        transfer.copy_commits(&missing)?;
        remote.refs().move_branch(&branch, &head_oid)?;

        tracing::info!(remote = %remote_name, branch = %branch, head = %head_oid, "pushed");
        Ok(())
    }
}
