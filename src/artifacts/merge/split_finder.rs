//! Split point finder for three-way merges
//!
//! The split point of two commits is the base their changes are measured
//! against. It is found in two steps:
//!
//! 1. Walk the ancestors of the first commit breadth-first, from the commit
//!    itself through its parents, recording the order in which commits are
//!    popped off the frontier.
//! 2. Walk the ancestors of the second commit the same way, then pick the first
//!    commit of the first walk that the second walk also reached.
//!
//! Every commit is visited at most once, so merge diamonds and criss-crosses
//! terminate. In criss-cross histories the result depends on which commit is
//! given first; callers always pass the current head first.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let finder = SplitFinder::new(|oid| repository.database().load_slim_commit(oid));
//!
//! let split_point = finder.find_split_point(&head_oid, &other_oid)?;
//! ```

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::collections::{HashSet, VecDeque};

/// Finds ancestors and split points over any commit storage
///
/// # Type Parameters
///
/// * `CommitLoaderFn` - Loads the parents of a commit by id. Local and remote
///   stores, as well as in-memory graphs in tests, all plug in here.
#[derive(Debug, Clone)]
pub struct SplitFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> SplitFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Every ancestor of `start`, itself included, in breadth-first discovery order
    pub fn ancestors(&self, start: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        let mut order = Vec::new();
        let mut seen = HashSet::from([start.clone()]);
        let mut frontier = VecDeque::from([start.clone()]);

        while let Some(oid) = frontier.pop_front() {
            let commit = (self.commit_loader)(&oid)?;

            for parent in commit.parents {
                if seen.insert(parent.clone()) {
                    frontier.push_back(parent);
                }
            }

            order.push(oid);
        }

        Ok(order)
    }

    /// First ancestor of `first`, in discovery order, that is also an ancestor of `second`
    pub fn find_split_point(
        &self,
        first: &ObjectId,
        second: &ObjectId,
    ) -> anyhow::Result<ObjectId> {
        let second_ancestors = self.ancestors(second)?.into_iter().collect::<HashSet<_>>();

        let split_point = self
            .ancestors(first)?
            .into_iter()
            .find(|oid| second_ancestors.contains(oid))
            .with_context(|| format!("commits {first} and {second} share no history"))?;

        tracing::debug!(first = %first, second = %second, split = %split_point, "found split point");
        Ok(split_point)
    }

    pub fn is_ancestor(&self, ancestor: &ObjectId, descendant: &ObjectId) -> anyhow::Result<bool> {
        Ok(self.ancestors(descendant)?.contains(ancestor))
    }
}
