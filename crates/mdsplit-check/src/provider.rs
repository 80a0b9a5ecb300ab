//! File access for the checker.
//!
//! The checker only needs to enumerate files by glob and read them by
//! relative path. [`FsProvider`] does this against a directory on disk;
//! tests can supply any other implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use mdsplit_core::util::{files, paths};
use mdsplit_core::Result;

/// Read-only view of a destination tree.
#[async_trait]
pub trait FileProvider: Send + Sync {
    /// Relative paths of every file whose path matches `pattern`, sorted.
    async fn list(&self, pattern: &str) -> Result<Vec<PathBuf>>;

    /// Contents of the file at relative `path`, or `None` if it does not
    /// exist.
    async fn read(&self, path: &Path) -> Result<Option<String>>;
}

/// [`FileProvider`] over a directory on the local filesystem.
#[derive(Clone, Debug)]
pub struct FsProvider {
    root: PathBuf,
}

impl FsProvider {
    /// Create a provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl FileProvider for FsProvider {
    async fn list(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let found = files::find_files(&self.root, pattern).await?;
        Ok(found.into_iter().map(|f| f.relative_path).collect())
    }

    async fn read(&self, path: &Path) -> Result<Option<String>> {
        let full = paths::resolve_destination(&self.root, path)?;
        if !files::is_file(&full).await {
            return Ok(None);
        }
        files::read_file(&full).await.map(Some)
    }
}
