//! Exchange of commits and blobs between two stores
//!
//! Remotes are other stores reached through the filesystem. A transfer copies
//! a list of commits from a source store into a destination store, each
//! commit preceded by the blobs it references, so the destination never holds
//! a commit whose content is missing.

use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::RemoteName;
use crate::artifacts::merge::split_finder::SplitFinder;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use std::collections::HashSet;

/// Open the store a remote points at
///
/// Relative locations are resolved against the working tree of `repository`.
/// An unknown remote and an unreadable store are both `RemoteNotFound`.
pub fn open_remote(repository: &Repository, name: &RemoteName) -> anyhow::Result<Repository> {
    let location = repository
        .remotes()
        .location(name)?
        .ok_or(TwigError::RemoteNotFound)?;
    let store = repository.path().join(location);

    if !store.is_dir() {
        tracing::info!(remote = %name, store = %store.display(), "remote store is not accessible");
        return Err(TwigError::RemoteNotFound.into());
    }

    Repository::open_store(&store)
}

/// Ancestors of `start` in `repository`, itself included, in discovery order
pub fn closure(repository: &Repository, start: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
    SplitFinder::new(|oid| repository.database().load_slim_commit(oid)).ancestors(start)
}

pub struct Transfer<'r> {
    source: &'r Repository,
    destination: &'r Repository,
}

impl<'r> Transfer<'r> {
    pub fn new(source: &'r Repository, destination: &'r Repository) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Commits of the closure of `head` in the source outside `known`, in closure order
    pub fn missing_commits(
        &self,
        head: &ObjectId,
        known: &HashSet<ObjectId>,
    ) -> anyhow::Result<Vec<ObjectId>> {
        Ok(closure(self.source, head)?
            .into_iter()
            .filter(|oid| !known.contains(oid))
            .collect())
    }

    /// Copy commits and the blobs they reference into the destination
    ///
    /// # Returns
    ///
    /// The number of commits copied
    pub fn copy_commits(&self, commits: &[ObjectId]) -> anyhow::Result<usize> {
        let source_database = self.source.database();
        let destination_database = self.destination.database();

        for oid in commits {
            let commit = source_database.load_commit(oid)?;

            for blob_oid in commit.snapshot().values() {
                if !destination_database.contains_blob(blob_oid) {
                    destination_database.store_blob(&source_database.load_blob(blob_oid)?)?;
                }
            }

            destination_database.store_commit(&commit)?;
        }

        tracing::info!(commits = commits.len(), "copied commits between stores");
        Ok(commits.len())
    }
}
