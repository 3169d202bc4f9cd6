use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::path::Path;

/// Working tree of a store
///
/// Only plain files directly in the root are visible. Hidden entries (the
/// store directory among them) and subdirectories are ignored.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `name` can be tracked: a plain, visible file name on one line
    pub fn is_trackable(name: &str) -> bool {
        !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\n', '\r'])
            && !name.contains(std::path::MAIN_SEPARATOR)
    }

    /// Plain file names in the root, sorted
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut names = std::fs::read_dir(&self.path)
            .with_context(|| format!("Unable to list {}", self.path.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| Self::is_trackable(name))
            .collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }

    pub fn exists(&self, name: &str) -> bool {
        Self::is_trackable(name) && self.path.join(name).is_file()
    }

    /// Content of a working file, or None if it is absent
    pub fn read_file(&self, name: &str) -> anyhow::Result<Option<Bytes>> {
        if !self.exists(name) {
            return Ok(None);
        }

        let file_path = self.path.join(name);
        let content = std::fs::read(&file_path)
            .with_context(|| format!("Unable to read {}", file_path.display()))?;

        Ok(Some(content.into()))
    }

    pub fn parse_blob(&self, name: &str) -> anyhow::Result<Option<Blob>> {
        Ok(self.read_file(name)?.map(Blob::new))
    }

    pub fn write_file(&self, name: &str, content: &[u8]) -> anyhow::Result<()> {
        let file_path = self.path.join(name);

        std::fs::write(&file_path, content)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))
    }

    /// Delete a working file if it is present
    pub fn remove_file(&self, name: &str) -> anyhow::Result<()> {
        let file_path = self.path.join(name);

        if file_path.is_file() {
            std::fs::remove_file(&file_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lists_only_visible_top_level_files() {
        let dir = TempDir::new().unwrap();
        dir.child("b.txt").write_str("b").unwrap();
        dir.child("a.txt").write_str("a").unwrap();
        dir.child(".hidden").write_str("h").unwrap();
        dir.child("nested/c.txt").write_str("c").unwrap();

        let workspace = Workspace::new(dir.path().into());

        assert_eq!(workspace.list_files().unwrap(), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn names_spanning_lines_are_not_trackable() {
        let dir = TempDir::new().unwrap();
        dir.child("a\nb").write_str("newline").unwrap();
        dir.child("c\rd").write_str("carriage return").unwrap();
        dir.child("plain.txt").write_str("plain").unwrap();

        let workspace = Workspace::new(dir.path().into());

        assert_eq!(workspace.list_files().unwrap(), vec!["plain.txt"]);
        assert!(!workspace.exists("a\nb"));
        assert_eq!(workspace.read_file("c\rd").unwrap(), None);
    }

    #[test]
    fn nested_paths_are_not_files_of_the_tree() {
        let dir = TempDir::new().unwrap();
        dir.child("nested/c.txt").write_str("c").unwrap();

        let workspace = Workspace::new(dir.path().into());

        assert!(!workspace.exists("nested/c.txt"));
        assert_eq!(workspace.read_file("nested/c.txt").unwrap(), None);
    }
}
