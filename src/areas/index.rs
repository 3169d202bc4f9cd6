//! Staging area
//!
//! Two directories hold pending changes for the next commit: `stage-add/`
//! keeps a copy of each file staged for addition, `stage-remove/` a copy of
//! the last committed content of each file staged for removal. A path is in
//! at most one of them.

use crate::areas::repository::StoreLayout;
use crate::artifacts::core::write_atomically;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Index {
    add_path: Box<Path>,
    remove_path: Box<Path>,
}

impl Index {
    pub fn new(layout: &StoreLayout) -> Self {
        Index {
            add_path: layout.stage_add().into_boxed_path(),
            remove_path: layout.stage_remove().into_boxed_path(),
        }
    }

    /// Paths staged for addition, sorted
    pub fn staged_for_add(&self) -> anyhow::Result<Vec<String>> {
        Self::list(&self.add_path)
    }

    /// Paths staged for removal, sorted
    pub fn staged_for_remove(&self) -> anyhow::Result<Vec<String>> {
        Self::list(&self.remove_path)
    }

    pub fn is_staged_for_add(&self, path: &str) -> bool {
        self.add_path.join(path).is_file()
    }

    pub fn is_staged_for_remove(&self, path: &str) -> bool {
        self.remove_path.join(path).is_file()
    }

    pub fn is_empty(&self) -> anyhow::Result<bool> {
        Ok(self.staged_for_add()?.is_empty() && self.staged_for_remove()?.is_empty())
    }

    /// Stage content for addition, dropping any pending removal of the path
    pub fn stage_add(&self, path: &str, content: &[u8]) -> anyhow::Result<()> {
        self.unstage_remove(path)?;
        write_atomically(&self.add_path.join(path), content)
    }

    /// Stage a removal, dropping any pending addition of the path
    pub fn stage_remove(&self, path: &str, content: &[u8]) -> anyhow::Result<()> {
        self.unstage_add(path)?;
        write_atomically(&self.remove_path.join(path), content)
    }

    /// # Returns
    ///
    /// true if the path was staged for addition
    pub fn unstage_add(&self, path: &str) -> anyhow::Result<bool> {
        Self::remove_entry(self.add_path.join(path))
    }

    /// # Returns
    ///
    /// true if the path was staged for removal
    pub fn unstage_remove(&self, path: &str) -> anyhow::Result<bool> {
        Self::remove_entry(self.remove_path.join(path))
    }

    pub fn read_staged(&self, path: &str) -> anyhow::Result<Bytes> {
        let staged_path = self.add_path.join(path);

        std::fs::read(&staged_path)
            .map(Bytes::from)
            .with_context(|| format!("Unable to read staged file {}", staged_path.display()))
    }

    pub fn read_removed(&self, path: &str) -> anyhow::Result<Bytes> {
        let removed_path = self.remove_path.join(path);

        std::fs::read(&removed_path)
            .map(Bytes::from)
            .with_context(|| format!("Unable to read removed file {}", removed_path.display()))
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        for path in self.staged_for_add()? {
            self.unstage_add(&path)?;
        }
        for path in self.staged_for_remove()? {
            self.unstage_remove(&path)?;
        }

        Ok(())
    }

    fn remove_entry(path: PathBuf) -> anyhow::Result<bool> {
        if !path.is_file() {
            return Ok(false);
        }

        std::fs::remove_file(&path)
            .with_context(|| format!("Unable to unstage {}", path.display()))?;

        Ok(true)
    }

    fn list(dir: &Path) -> anyhow::Result<Vec<String>> {
        if !dir.is_dir() {
            return Ok(vec![]);
        }

        let mut paths = std::fs::read_dir(dir)
            .with_context(|| format!("Unable to list {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| !name.starts_with('.'))
            .collect::<Vec<_>>();
        paths.sort();

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn index() -> (TempDir, Index) {
        let dir = TempDir::new().unwrap();
        let index = Index::new(&StoreLayout::from_root(dir.path()));

        (dir, index)
    }

    #[rstest]
    fn a_path_is_never_in_both_stages(index: (TempDir, Index)) {
        let (_dir, index) = index;

        index.stage_add("a.txt", b"one").unwrap();
        index.stage_remove("a.txt", b"one").unwrap();
        assert!(!index.is_staged_for_add("a.txt"));
        assert!(index.is_staged_for_remove("a.txt"));

        index.stage_add("a.txt", b"two").unwrap();
        assert!(index.is_staged_for_add("a.txt"));
        assert!(!index.is_staged_for_remove("a.txt"));
    }

    #[rstest]
    fn staged_content_is_a_copy(index: (TempDir, Index)) {
        let (_dir, index) = index;

        index.stage_add("a.txt", b"snapshot").unwrap();

        assert_eq!(index.read_staged("a.txt").unwrap().as_ref(), b"snapshot");
    }

    #[rstest]
    fn clearing_empties_both_stages(index: (TempDir, Index)) {
        let (_dir, index) = index;
        index.stage_add("b.txt", b"b").unwrap();
        index.stage_add("a.txt", b"a").unwrap();
        index.stage_remove("c.txt", b"c").unwrap();

        assert_eq!(index.staged_for_add().unwrap(), vec!["a.txt", "b.txt"]);
        assert!(!index.is_empty().unwrap());

        index.clear().unwrap();

        assert!(index.is_empty().unwrap());
    }
}
