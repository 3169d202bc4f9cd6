//! Core utilities and shared types
//!
//! This module contains shared utilities used across the application.

use anyhow::Context;
use derive_new::new;
use fake::rand;
use minus::Pager;
use std::io::{self, Write};
use std::path::Path;

/// Wrapper that implements `Write` for the minus pager
///
/// The minus pager doesn't implement `std::io::Write` directly, so this wrapper
/// adapts it to be compatible with Rust's standard I/O traits. `log` and
/// `global-log` write through it when stdout is a terminal.
///
/// ## Usage
///
/// ```ignore
/// let pager = Pager::new();
/// let writer = PagerWriter::new(pager.clone());
/// let repository = Repository::new(root, Box::new(writer))?;
/// repository.log()?;
/// minus::page_all(pager)?;
/// ```
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(s).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Replace the content of `path` with `content`
///
/// The bytes land in a temporary sibling first and are renamed into place, so
/// a reader never observes a half-written file. Missing parent directories are
/// created.
pub fn write_atomically(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("Invalid file path {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Unable to create directory {}", dir.display()))?;

    let temp_path = dir.join(format!("tmp-{}", rand::random::<u32>()));

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("Unable to open file {}", temp_path.display()))?;
    file.write_all(content)
        .with_context(|| format!("Unable to write file {}", temp_path.display()))?;

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Unable to rename file to {}", path.display()))?;

    Ok(())
}
