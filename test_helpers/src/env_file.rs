//! Scratch `.env` files.

use std::fs;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A temporary directory for `.env` files, removed on drop.
///
/// # Examples
///
/// ```
/// use dotsettings_test_helpers::env_file::ScratchDir;
///
/// let scratch = ScratchDir::new().expect("create scratch dir");
/// let path = scratch.write(".env", "PORT=3000\n").expect("write env file");
/// assert!(path.is_absolute());
/// ```
#[derive(Debug)]
pub struct ScratchDir {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl ScratchDir {
    /// Create an empty scratch directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or its path is
    /// not valid UTF-8.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create scratch directory")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow!("scratch path is not UTF-8: {}", path.display()))?;
        Ok(Self { _dir: dir, root })
    }

    /// Absolute path of the scratch directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Absolute path of `name` inside the scratch directory.
    #[must_use]
    pub fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write `contents` to `name`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> Result<Utf8PathBuf> {
        let path = self.path(name);
        fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }

    /// Delete `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.path(name);
        fs::remove_file(&path).with_context(|| format!("remove {path}"))
    }
}
