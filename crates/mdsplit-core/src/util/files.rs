//! Async file utilities for mdsplit.
//!
//! The segmenter writes the destination tree through [`write_file`]; the
//! checker enumerates it with [`find_files`] and reads it with
//! [`read_file`].

use async_walkdir::WalkDir;
use futures::StreamExt;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{Error, Result};

/// `*` never crosses a `/`; only `**` does.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A regular file found under a search root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// Path relative to the search root.
    pub relative_path: PathBuf,
}

/// Find every regular file under `root` whose relative path matches the
/// glob `pattern`, e.g. `"**/*.md"` or `"phases/*.md"`.
///
/// Results are sorted by relative path. A missing `root` yields an empty
/// list; an invalid pattern is [`Error::InvalidData`].
///
/// # Example
///
/// ```no_run
/// # use mdsplit_core::util::files::find_files;
/// # use std::path::Path;
/// # async fn example() -> mdsplit_core::Result<()> {
/// let modules = find_files(Path::new("refactored"), "**/*.md").await?;
/// for module in modules {
///     println!("{}", module.relative_path.display());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn find_files(root: &Path, pattern: &str) -> Result<Vec<FoundFile>> {
    let matcher = Pattern::new(pattern)
        .map_err(|e| Error::invalid_data(format!("bad glob pattern '{pattern}': {e}")))?;

    let mut found = Vec::new();
    if !exists(root).await {
        return Ok(found);
    }

    let mut walker = WalkDir::new(root);
    while let Some(entry) = walker.next().await {
        let path = entry
            .map_err(|e| Error::io_with_path(std::io::Error::other(e), root))?
            .path();
        if !is_file(&path).await {
            continue;
        }

        let relative_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        if matcher.matches_path_with(&relative_path, MATCH_OPTIONS) {
            found.push(FoundFile {
                path,
                relative_path,
            });
        }
    }

    found.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    log::debug!(
        "{} file(s) under {} match '{pattern}'",
        found.len(),
        root.display()
    );
    Ok(found)
}

/// Read a file's contents as a string.
pub async fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))
}

/// Write `contents` to `path`, creating missing parent directories first.
///
/// Existing files are overwritten.
pub async fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io_with_path(e, parent))?;
    }
    fs::write(path, contents)
        .await
        .map_err(|e| Error::io_with_path(e, path))
}

/// Check if a path exists.
pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Check if a path exists and is a regular file.
pub async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
