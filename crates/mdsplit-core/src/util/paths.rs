//! Path resolution utilities.
//!
//! Source and output locations always arrive as explicit parameters; these
//! helpers only normalise them (tilde expansion, joining relative
//! destinations onto an output root).

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Expands `~` to the user's home directory.
///
/// If the path starts with `~`, replaces it with the user's home directory.
/// Otherwise returns the path unchanged.
///
/// # Example
///
/// ```
/// use mdsplit_core::util::paths::expand_tilde;
///
/// let expanded = expand_tilde("~/documents");
/// assert!(!expanded.starts_with("~"));
/// ```
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

/// Joins a destination path onto an output root.
///
/// Destinations must stay inside the root: absolute paths and `..`
/// components are rejected.
///
/// # Example
///
/// ```
/// use mdsplit_core::util::paths::resolve_destination;
/// use std::path::Path;
///
/// let path = resolve_destination(Path::new("out"), "phases/phase_1.md").unwrap();
/// assert_eq!(path, Path::new("out/phases/phase_1.md"));
/// ```
pub fn resolve_destination<P: AsRef<Path>>(root: &Path, destination: P) -> Result<PathBuf> {
    let destination = destination.as_ref();
    let escapes = destination.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(Error::invalid_data(format!(
            "destination '{}' must be a relative path inside the output root",
            destination.display()
        )));
    }
    Ok(root.join(destination))
}
