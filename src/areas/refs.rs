//! Branch references
//!
//! Each branch is a file under `refs/heads/` holding the 40-character id of the
//! commit it points at. Hierarchical names nest (`refs/heads/origin/master`).
//!
//! `HEAD` names the current branch as a symbolic reference:
//! `ref: refs/heads/<name>`. It always points at a branch; there is no
//! detached state.

use crate::areas::repository::StoreLayout;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::write_atomically;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use anyhow::Context;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Regex pattern for parsing the symbolic reference held by HEAD
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

static SYMREF: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(SYMREF_REGEX).ok());

#[derive(Debug)]
pub struct Refs {
    head_path: Box<Path>,
    heads_path: Box<Path>,
}

impl Refs {
    pub fn new(layout: &StoreLayout) -> Self {
        Refs {
            head_path: layout.head_file().into_boxed_path(),
            heads_path: layout.heads().into_boxed_path(),
        }
    }

    /// Name of the branch HEAD points at
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let content = std::fs::read_to_string(&self.head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", self.head_path))?;

        let symref_match = SYMREF
            .as_ref()
            .with_context(|| format!("invalid symref regex: {SYMREF_REGEX}"))?
            .captures(content.trim())
            .with_context(|| format!("HEAD does not name a branch: {:?}", content.trim()))?;

        BranchName::try_parse(symref_match[1].to_string())
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.current_branch()? == branch_name)
    }

    /// Point HEAD at another branch; no branch moves
    pub fn set_current(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        write_atomically(
            &self.head_path,
            format!("ref: refs/heads/{}", branch_name).as_bytes(),
        )
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.branch_path(branch_name).is_file()
    }

    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let path = self.branch_path(branch_name);

        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;

        Ok(Some(ObjectId::try_parse(content.trim().to_string())?))
    }

    /// Create a branch, failing if the name is taken
    pub fn create_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(branch_name) {
            return Err(TwigError::BranchAlreadyExists.into());
        }

        self.move_branch(branch_name, oid)
    }

    /// Point a branch at a commit, creating it if absent
    ///
    /// Fails with `BranchAlreadyExists` when the name clashes with nested refs.
    pub fn move_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        if self.clashes(branch_name) {
            tracing::info!(branch = %branch_name, "branch name clashes with an existing ref");
            return Err(TwigError::BranchAlreadyExists.into());
        }

        tracing::debug!(branch = %branch_name, oid = %oid, "moving branch");

        write_atomically(&self.branch_path(branch_name), oid.as_ref().as_bytes())
    }

    /// Delete a branch other than the current one
    pub fn delete_branch(&self, branch_name: &BranchName) -> anyhow::Result<ObjectId> {
        let oid = self
            .read_branch(branch_name)?
            .ok_or(TwigError::BranchNotFound)?;

        if self.is_current_branch(branch_name)? {
            return Err(TwigError::CannotRemoveCurrent.into());
        }

        let branch_path = self.branch_path(branch_name);
        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;

        Ok(oid)
    }

    /// Every branch, sorted by name
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let mut branches = WalkDir::new(&self.heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&self.heads_path).ok()?;
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                BranchName::try_parse(name).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    /// Whether the branch file cannot exist next to the refs already present:
    /// `a` while `a/b` exists, or `a/b` while `a` exists
    pub fn clashes(&self, branch_name: &BranchName) -> bool {
        let path = self.branch_path(branch_name);

        path.is_dir()
            || path
                .ancestors()
                .skip(1)
                .take_while(|ancestor| *ancestor != self.heads_path.as_ref())
                .any(Path::is_file)
    }

    fn branch_path(&self, branch_name: &BranchName) -> PathBuf {
        branch_name
            .as_ref()
            .split('/')
            .fold(self.heads_path.to_path_buf(), |path, part| path.join(part))
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path.as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::hash_bytes;
    use crate::errors::user_error;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name).unwrap()
    }

    #[fixture]
    fn refs() -> (TempDir, Refs) {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(&StoreLayout::from_root(dir.path()));

        refs.move_branch(&branch("master"), &hash_bytes(b"root")).unwrap();
        refs.set_current(&branch("master")).unwrap();

        (dir, refs)
    }

    #[rstest]
    fn head_names_the_current_branch(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        assert_eq!(refs.current_branch().unwrap(), branch("master"));
    }

    #[rstest]
    fn duplicate_branches_are_rejected(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        let error = refs
            .create_branch(&branch("master"), &hash_bytes(b"other"))
            .unwrap_err();

        assert_eq!(user_error(&error), Some(&TwigError::BranchAlreadyExists));
        assert_eq!(
            refs.read_branch(&branch("master")).unwrap(),
            Some(hash_bytes(b"root"))
        );
    }

    #[rstest]
    fn the_current_branch_cannot_be_deleted(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        let error = refs.delete_branch(&branch("master")).unwrap_err();

        assert_eq!(user_error(&error), Some(&TwigError::CannotRemoveCurrent));
    }

    #[rstest]
    fn deleting_a_missing_branch_fails(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        let error = refs.delete_branch(&branch("ghost")).unwrap_err();

        assert_eq!(user_error(&error), Some(&TwigError::BranchNotFound));
    }

    #[rstest]
    fn hierarchical_branches_are_listed_and_pruned(refs: (TempDir, Refs)) {
        let (dir, refs) = refs;
        refs.create_branch(&branch("origin/master"), &hash_bytes(b"remote"))
            .unwrap();

        assert_eq!(
            refs.list_branches().unwrap(),
            vec![branch("master"), branch("origin/master")]
        );

        refs.delete_branch(&branch("origin/master")).unwrap();

        assert!(!dir.path().join(".twig/refs/heads/origin").exists());
        assert_eq!(refs.list_branches().unwrap(), vec![branch("master")]);
    }

    #[rstest]
    #[case::parent_of_nested_ref("origin/master", "origin")]
    #[case::nested_under_branch("origin", "origin/master")]
    #[case::deeply_nested_under_branch("origin", "origin/feature/x")]
    fn names_clashing_with_nested_refs_are_taken(
        refs: (TempDir, Refs),
        #[case] existing: &str,
        #[case] clashing: &str,
    ) {
        let (_dir, refs) = refs;
        refs.create_branch(&branch(existing), &hash_bytes(b"remote"))
            .unwrap();

        assert!(refs.clashes(&branch(clashing)));
        let error = refs
            .create_branch(&branch(clashing), &hash_bytes(b"other"))
            .unwrap_err();
        assert_eq!(user_error(&error), Some(&TwigError::BranchAlreadyExists));
        let error = refs
            .move_branch(&branch(clashing), &hash_bytes(b"other"))
            .unwrap_err();
        assert_eq!(user_error(&error), Some(&TwigError::BranchAlreadyExists));

        assert_eq!(
            refs.list_branches().unwrap(),
            vec![branch("master"), branch(existing)]
        );
    }

    #[rstest]
    fn siblings_of_nested_refs_do_not_clash(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        refs.create_branch(&branch("origin/master"), &hash_bytes(b"remote"))
            .unwrap();

        assert!(!refs.clashes(&branch("origin/feature")));
        assert!(!refs.clashes(&branch("origin/master")));
        assert!(!refs.clashes(&branch("originals")));
    }
}
