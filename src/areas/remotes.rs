//! Remote descriptors
//!
//! Each remote is a file `remotes/<name>` holding the path of another store
//! directory, relative to the working tree or absolute.

use crate::artifacts::branch::branch_name::RemoteName;
use crate::artifacts::core::write_atomically;
use crate::errors::TwigError;
use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};

#[derive(Debug, new)]
pub struct Remotes {
    path: Box<Path>,
}

impl Remotes {
    /// Record a remote
    ///
    /// `/` in the location is read as a path separator on every platform.
    pub fn add(&self, name: &RemoteName, location: &str) -> anyhow::Result<()> {
        let remote_path = self.path.join(name.as_ref());

        if remote_path.is_file() {
            return Err(TwigError::RemoteAlreadyExists.into());
        }

        let location = location.replace('/', std::path::MAIN_SEPARATOR_STR);
        write_atomically(&remote_path, location.as_bytes())
    }

    pub fn remove(&self, name: &RemoteName) -> anyhow::Result<()> {
        let remote_path = self.path.join(name.as_ref());

        if !remote_path.is_file() {
            return Err(TwigError::UnknownRemote.into());
        }

        std::fs::remove_file(&remote_path)
            .with_context(|| format!("Unable to remove remote {}", remote_path.display()))
    }

    /// Recorded location of a remote store directory
    pub fn location(&self, name: &RemoteName) -> anyhow::Result<Option<PathBuf>> {
        let remote_path = self.path.join(name.as_ref());

        if !remote_path.is_file() {
            return Ok(None);
        }

        let location = std::fs::read_to_string(&remote_path)
            .with_context(|| format!("Unable to read remote {}", remote_path.display()))?;

        Ok(Some(PathBuf::from(location.trim_end_matches(['\n', '\r']))))
    }
}
