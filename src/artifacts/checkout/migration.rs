//! Migration of the working tree between two snapshots
//!
//! Moving from the current commit to a target commit (branch checkout, reset
//! and fast-forward) happens in two phases:
//!
//! 1. Planning: find the files to delete and write, and refuse to go on if a
//!    file the target would create is already present but untracked.
//! 2. Applying: delete the files only the current snapshot tracks, write every
//!    file of the target snapshot, then clear the staging area.
//!
//! Nothing is touched when planning fails.

use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Snapshot;
use crate::errors::TwigError;

/// Paths the target would create over files that the current snapshot does not track
pub fn untracked_in_the_way(
    repository: &Repository,
    current: &Snapshot,
    target: &Snapshot,
) -> Vec<String> {
    target
        .keys()
        .filter(|path| !current.contains_key(*path))
        .filter(|path| repository.workspace().exists(path))
        .cloned()
        .collect()
}

/// Fail with `UntrackedFileConflict` if an untracked file is in the way
pub fn ensure_nothing_in_the_way(
    repository: &Repository,
    current: &Snapshot,
    target: &Snapshot,
) -> anyhow::Result<()> {
    let in_the_way = untracked_in_the_way(repository, current, target);

    if in_the_way.is_empty() {
        Ok(())
    } else {
        tracing::info!(paths = ?in_the_way, "untracked files block the checkout");
        Err(TwigError::UntrackedFileConflict.into())
    }
}

pub struct Migration<'r> {
    repository: &'r Repository,
    current: &'r Snapshot,
    target: &'r Snapshot,
    deletions: Vec<String>,
}

impl<'r> Migration<'r> {
    pub fn new(repository: &'r Repository, current: &'r Snapshot, target: &'r Snapshot) -> Self {
        Self {
            repository,
            current,
            target,
            deletions: Vec::new(),
        }
    }

    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.plan_changes()?;
        self.update_workspace()?;
        self.repository.index().clear()?;

        Ok(())
    }

    fn plan_changes(&mut self) -> anyhow::Result<()> {
        ensure_nothing_in_the_way(self.repository, self.current, self.target)?;

        self.deletions = self
            .current
            .keys()
            .filter(|path| !self.target.contains_key(*path))
            .cloned()
            .collect();

        Ok(())
    }

    fn update_workspace(&self) -> anyhow::Result<()> {
        let workspace = self.repository.workspace();

        for path in &self.deletions {
            workspace.remove_file(path)?;
        }

        for (path, blob_oid) in self.target {
            let blob = self.repository.database().load_blob(blob_oid)?;
            workspace.write_file(path, blob.content())?;
        }

        tracing::debug!(
            deleted = self.deletions.len(),
            written = self.target.len(),
            "migrated working tree"
        );
        Ok(())
    }
}
