use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::ensure_nothing_in_the_way;
use crate::artifacts::merge::MergeOutcome;
use crate::artifacts::merge::resolution::{MergeAction, classify, conflict_block};
use crate::artifacts::merge::split_finder::SplitFinder;
use crate::artifacts::objects::commit::{Commit, commit_timestamp};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::io::Write;

impl Repository {
    /// Merge another branch into the current one
    ///
    /// Nothing is modified when a precondition fails. A conflicted merge still
    /// commits, with conflict blocks in place of the conflicted files.
    pub fn merge(&self, branch_name: &str) -> anyhow::Result<MergeOutcome> {
        if !self.index().is_empty()? {
            return Err(TwigError::UncommittedChanges.into());
        }

        let other_branch = BranchName::try_parse(branch_name)
            .ok()
            .filter(|branch| self.refs().branch_exists(branch))
            .ok_or(TwigError::BranchNotFound)?;
        let current_branch = self.refs().current_branch()?;
        if other_branch == current_branch {
            return Err(TwigError::SelfMerge.into());
        }

        let (head_oid, head) = self.head_commit()?;
        let other_oid = self
            .refs()
            .read_branch(&other_branch)?
            .ok_or(TwigError::BranchNotFound)?;

        let split_oid = SplitFinder::new(|oid| self.database().load_slim_commit(oid))
            .find_split_point(&head_oid, &other_oid)?;

        let outcome = if split_oid == other_oid {
            MergeOutcome::AlreadyAncestor
        } else if split_oid == head_oid {
            self.restore(&other_oid)?;
            self.refs().move_branch(&current_branch, &other_oid)?;

            MergeOutcome::FastForwarded
        } else {
            let other = self.database().load_commit(&other_oid)?;
            let split = self.database().load_commit(&split_oid)?;
            ensure_nothing_in_the_way(self, head.snapshot(), other.snapshot())?;

            let conflicted = self.apply_merge(&split, &head, &other)?;

            let commit = Commit::merge(
                head_oid,
                &head,
                other_oid,
                format!("Merged {} into {}.", other_branch, current_branch),
                commit_timestamp(),
            );
            let merge_oid = self.write_commit(commit)?;
            self.refs().move_branch(&current_branch, &merge_oid)?;

            MergeOutcome::Merged { conflicted }
        };

        tracing::info!(branch = %other_branch, outcome = ?outcome, "merged");
        if let Some(message) = outcome.message() {
            writeln!(self.writer(), "{}", message)?;
        }

        Ok(outcome)
    }

    /// Apply every path's resolution to the working tree and staging area
    ///
    /// # Returns
    ///
    /// true if any path was left in conflict
    fn apply_merge(&self, split: &Commit, current: &Commit, other: &Commit) -> anyhow::Result<bool> {
        let paths = current
            .snapshot()
            .keys()
            .chain(other.snapshot().keys())
            .collect::<BTreeSet<_>>();
        let mut conflicted = false;

        for path in paths {
            let current_oid = current.tracked_oid(path);
            let other_oid = other.tracked_oid(path);

            match classify(split.tracked_oid(path), current_oid, other_oid) {
                MergeAction::TakeOther => {
                    let content = self.blob_content(other_oid)?.unwrap_or_default();
                    self.workspace().write_file(path, &content)?;
                    self.index().stage_add(path, &content)?;
                }
                MergeAction::Remove => {
                    let content = self.blob_content(current_oid)?.unwrap_or_default();
                    self.index().stage_remove(path, &content)?;
                    self.workspace().remove_file(path)?;
                }
                MergeAction::Conflict => {
                    let block = conflict_block(
                        self.blob_content(current_oid)?.as_deref(),
                        self.blob_content(other_oid)?.as_deref(),
                    );
                    self.workspace().write_file(path, &block)?;
                    self.index().stage_add(path, &block)?;

                    tracing::debug!(path = %path, "merge conflict");
                    conflicted = true;
                }
                MergeAction::Keep => {}
            }
        }

        Ok(conflicted)
    }

    fn blob_content(&self, blob_oid: Option<&ObjectId>) -> anyhow::Result<Option<Bytes>> {
        blob_oid
            .map(|oid| self.database().load_blob(oid).map(|blob| blob.into_content()))
            .transpose()
    }
}
