use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PakError, Result};
use crate::io::{LocalFileReader, ReadAt, ensure_dirs};

use super::parser::PakReader;
use super::structures::PakEntry;

/// Writes the entries of a container back to disk.
pub struct PakExtractor<R: ReadAt> {
    reader: PakReader<R>,
    overwrite: bool,
}

impl<R: ReadAt> PakExtractor<R> {
    pub fn new(reader: PakReader<R>) -> Self {
        Self {
            reader,
            overwrite: false,
        }
    }

    /// Allow replacing files that already exist under the destination.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// List all entries in the archive
    pub fn entries(&self) -> &[PakEntry] {
        self.reader.entries()
    }

    /// Extract every entry under `dest`, creating it if needed.
    ///
    /// Destination paths are resolved and checked for conflicts before the
    /// first file is written. `on_entry` is called after each file.
    pub fn extract_to(
        &self,
        dest: &Path,
        mut on_entry: impl FnMut(&PakEntry),
    ) -> Result<Vec<PathBuf>> {
        let mut targets = Vec::with_capacity(self.entries().len());
        let mut seen = HashSet::with_capacity(self.entries().len());
        for entry in self.entries() {
            let relative = entry.relative_path()?;
            if !seen.insert(relative.clone()) {
                return Err(PakError::corrupt(format!(
                    "entry '{}' maps to {} which an earlier entry already uses",
                    entry.name,
                    relative.display()
                )));
            }
            let path = dest.join(relative);
            if !self.overwrite && path.exists() {
                return Err(PakError::AlreadyExists {
                    path: path.display().to_string(),
                });
            }
            targets.push(path);
        }

        ensure_dirs(dest)?;
        debug!("extracting {} entries into {}", targets.len(), dest.display());

        for (entry, path) in self.entries().iter().zip(&targets) {
            let data = self.reader.read_entry(entry)?;
            if let Some(parent) = path.parent() {
                ensure_dirs(parent)?;
            }
            std::fs::write(path, &data)?;
            on_entry(entry);
        }

        Ok(targets)
    }
}

/// Directory an archive extracts into by default: its file name without
/// the extension, relative to the current directory.
pub fn default_output_dir(archive: &Path) -> PathBuf {
    archive
        .file_stem()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("out"))
}

/// Open the archive at `archive` and extract it under `dest`.
pub fn extract_archive(
    archive: &Path,
    dest: &Path,
    overwrite: bool,
    on_entry: impl FnMut(&PakEntry),
) -> Result<Vec<PathBuf>> {
    let reader = PakReader::open(LocalFileReader::new(archive)?)?;
    PakExtractor::new(reader)
        .overwrite(overwrite)
        .extract_to(dest, on_entry)
}
