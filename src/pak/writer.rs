use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PakError, Result};
use crate::io::list_files;

use super::codec;
use super::structures::{
    DirectoryBlock, MAGIC, PAK_EXTENSION, PakEntry, PakHeader, name_components, to_u32,
};

/// Builds a container on any seekable sink.
///
/// File bytes go straight to the sink as they are added; the directory
/// block is kept in memory and written by [`finish`](Self::finish).
pub struct PakWriter<W: Write + Seek> {
    inner: W,
    offset: u64,
    directory: DirectoryBlock,
}

impl<W: Write + Seek> PakWriter<W> {
    /// Start a container, reserving the header with a placeholder.
    pub fn new(mut inner: W) -> Result<Self> {
        inner.seek(SeekFrom::Start(0))?;
        let mut placeholder = [0u8; PakHeader::SIZE];
        placeholder[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        inner.write_all(&placeholder)?;

        Ok(Self {
            inner,
            offset: PakHeader::SIZE as u64,
            directory: DirectoryBlock::default(),
        })
    }

    /// Append one file. `name` is the path relative to the packed root.
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<&PakEntry> {
        if !name.is_ascii() {
            return Err(PakError::NonAsciiName {
                name: name.to_string(),
            });
        }
        name_components(name)?;

        let start = to_u32(self.offset)?;
        let end = to_u32(self.offset + data.len() as u64)?;

        self.inner.write_all(data)?;
        self.offset = u64::from(end);

        self.directory.entries.push(PakEntry {
            name: name.to_string(),
            start,
            end,
        });
        Ok(&self.directory.entries[self.directory.entries.len() - 1])
    }

    /// Entries added so far, in insertion order.
    pub fn entries(&self) -> &[PakEntry] {
        &self.directory.entries
    }

    /// Compress the directory block, write it after the payload and patch
    /// the header. Returns the sink.
    pub fn finish(mut self) -> Result<W> {
        let raw = self.directory.encode()?;
        let compressed = codec::compress(&raw)?;

        let header = PakHeader {
            payload_end: to_u32(self.offset)?,
            directory_size: to_u32(raw.len() as u64)?,
            directory_compressed_size: to_u32(compressed.len() as u64)?,
        };
        // The whole file has to stay addressable by 32-bit offsets.
        to_u32(self.offset + compressed.len() as u64)?;

        debug!(
            "finishing pak: {} entries, payload ends at {}, directory {} -> {} bytes",
            self.directory.entries.len(),
            header.payload_end,
            header.directory_size,
            header.directory_compressed_size
        );

        self.inner.seek(SeekFrom::Start(0))?;
        self.inner.write_all(&header.to_bytes())?;
        self.inner.seek(SeekFrom::Start(self.offset))?;
        self.inner.write_all(&compressed)?;
        self.inner.flush()?;

        Ok(self.inner)
    }
}

/// Result of packing a directory.
#[derive(Debug, Clone)]
pub struct PackSummary {
    pub output: PathBuf,
    pub entries: Vec<PakEntry>,
}

impl PackSummary {
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.size())).sum()
    }
}

/// `<dir>.pak` next to `dir`.
pub fn default_archive_path(dir: &Path) -> PathBuf {
    // Collecting components drops any trailing separator.
    let mut name = dir.components().collect::<PathBuf>().into_os_string();
    name.push(".");
    name.push(PAK_EXTENSION);
    PathBuf::from(name)
}

/// Pack every file under `root` into a new container at `output`.
///
/// `on_entry` is called after each file is written. On error a partial
/// file may be left at `output`.
pub fn pack_directory(
    root: &Path,
    output: &Path,
    mut on_entry: impl FnMut(&PakEntry),
) -> Result<PackSummary> {
    let files = list_files(root)?;
    debug!("packing {} files from {}", files.len(), root.display());

    let file = File::create(output)?;
    let mut writer = PakWriter::new(BufWriter::new(file))?;

    for path in files {
        // The archive itself may live under the root being packed.
        if same_file(&path, output) {
            continue;
        }
        let name = relative_name(root, &path)?;
        let data = std::fs::read(&path)?;
        let entry = writer.add_file(&name, &data)?;
        on_entry(entry);
    }

    let entries = writer.entries().to_vec();
    let inner = writer.finish()?;
    inner.into_inner().map_err(|e| e.into_error())?.sync_all()?;

    Ok(PackSummary {
        output: output.to_path_buf(),
        entries,
    })
}

/// Relative name with the root prefix stripped, components joined by `/`.
fn relative_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| PakError::UnsafePath {
            name: path.display().to_string(),
        })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component.as_os_str();
        match part.to_str() {
            // A literal backslash would be read back as a separator.
            Some(s) if s.contains('\\') => {
                return Err(PakError::UnsafePath {
                    name: relative.display().to_string(),
                });
            }
            Some(s) if s.is_ascii() => parts.push(s),
            _ => {
                return Err(PakError::NonAsciiName {
                    name: relative.display().to_string(),
                });
            }
        }
    }
    Ok(parts.join("/"))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
