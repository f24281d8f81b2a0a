//! Project tree helpers: root resolution, directory claims and scans

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Resolve a project root to an absolute path without `\\?\` prefixes.
pub fn canonical_root(path: &Path) -> Result<PathBuf> {
    let resolved = dunce::canonicalize(path).map_err(|e| Error::io(path, e))?;
    if !resolved.is_dir() {
        return Err(Error::NotADirectory { path: resolved });
    }
    Ok(resolved)
}

/// Create `path` and all missing parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Atomically claim a destination directory.
///
/// Parents are created as needed; the leaf is created with a single
/// `create_dir`, so of several racing callers exactly one gets `true`.
/// Returns `false` when the directory already existed.
pub fn claim_dir(path: &Path) -> Result<bool> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    match fs::create_dir(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// List the immediate, non-hidden subdirectories of `path`, sorted by name.
///
/// A missing directory yields an empty list.
pub fn list_module_dirs(path: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(path, e)),
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(path, e))?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden {
            continue;
        }
        let entry_path = entry.path();
        if entry_path.is_dir() {
            dirs.push(entry_path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
