//! Filesystem helpers used around the container format.

use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::WalkDir;

use crate::error::{PakError, Result};

/// List every regular file under `root`, recursively.
///
/// Symbolic links are followed, so a linked file is listed under the link's
/// own path. Link loops are reported as errors. Order follows the directory
/// walk and is not sorted.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).min_depth(1) {
        let entry = entry.map_err(|e| PakError::Io(e.into()))?;
        if entry.file_type().is_file() {
            trace!("found {}", entry.path().display());
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Create every missing directory on `path`, one component at a time.
///
/// Existing directories are left alone, so calling this twice is harmless.
pub fn ensure_dirs(path: &Path) -> Result<()> {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        if !current.is_dir() {
            match std::fs::create_dir(&current) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && current.is_dir() => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}
