//! Container reader.
//!
//! This module validates the header and directory block of a pak file,
//! reading from any source that implements the [`ReadAt`] trait.
//!
//! ## Parsing Strategy
//!
//! 1. Read the fixed 16-byte header and check the magic
//! 2. Read the compressed directory block that starts at `payload_end`
//! 3. Inflate it and parse the entry list
//! 4. Bounds-check every entry against the payload region
//!
//! Nothing is handed to the caller until all four steps succeed, so an
//! extraction never starts on an archive that is known to be broken.

use tracing::debug;

use crate::error::{PakError, Result};
use crate::io::ReadAt;

use super::codec;
use super::structures::*;

/// Validated view of a container.
///
/// ## Example
///
/// ```no_run
/// use std::path::Path;
/// use pakpack::{LocalFileReader, PakReader};
///
/// let reader = PakReader::open(LocalFileReader::new(Path::new("assets.pak"))?)?;
/// for entry in reader.entries() {
///     let data = reader.read_entry(entry)?;
///     println!("{} ({} bytes)", entry.name, data.len());
/// }
/// # Ok::<(), pakpack::PakError>(())
/// ```
pub struct PakReader<R: ReadAt> {
    /// The underlying data source
    reader: R,
    header: PakHeader,
    entries: Vec<PakEntry>,
}

impl<R: ReadAt> PakReader<R> {
    /// Open and validate a container.
    ///
    /// # Arguments
    ///
    /// * `reader` - Random access source holding the whole container
    ///
    /// # Errors
    ///
    /// Returns [`PakError::InvalidMagic`] when the first four bytes are not
    /// the pak magic, and [`PakError::Corrupt`] or [`PakError::UnsafePath`]
    /// when the header or directory do not describe a readable archive.
    pub fn open(reader: R) -> Result<Self> {
        let size = reader.size();

        let header_len = size.min(PakHeader::SIZE as u64) as usize;
        let mut header_buf = vec![0u8; header_len];
        reader.read_exact_at(0, &mut header_buf)?;
        let header = PakHeader::from_bytes(&header_buf)?;

        debug!(
            "pak header: payload_end={}, directory={} bytes ({} compressed), file size={}",
            header.payload_end, header.directory_size, header.directory_compressed_size, size
        );

        let payload_end = u64::from(header.payload_end);
        if payload_end < PakHeader::SIZE as u64 {
            return Err(PakError::corrupt(format!(
                "payload end {payload_end} lies inside the header"
            )));
        }
        let directory_end = payload_end + u64::from(header.directory_compressed_size);
        if directory_end > size {
            return Err(PakError::corrupt(format!(
                "directory block ends at {directory_end} but file is {size} bytes"
            )));
        }

        let mut compressed = vec![0u8; header.directory_compressed_size as usize];
        reader.read_exact_at(payload_end, &mut compressed)?;
        let raw = codec::decompress(&compressed, header.directory_size as usize)?;
        let directory = DirectoryBlock::decode(&raw)?;

        for entry in &directory.entries {
            Self::validate_entry(entry, header.payload_end)?;
        }
        debug!("pak directory: {} entries", directory.entries.len());

        Ok(Self {
            reader,
            header,
            entries: directory.entries,
        })
    }

    /// Check that an entry's byte range lies inside the payload region and
    /// that its name stays inside the extraction root.
    fn validate_entry(entry: &PakEntry, payload_end: u32) -> Result<()> {
        if entry.start < PakHeader::SIZE as u32 || entry.start > entry.end || entry.end > payload_end
        {
            return Err(PakError::corrupt(format!(
                "entry '{}' spans {}..{} outside payload 16..{payload_end}",
                entry.name, entry.start, entry.end
            )));
        }
        name_components(&entry.name)?;
        Ok(())
    }

    /// The parsed header.
    pub fn header(&self) -> &PakHeader {
        &self.header
    }

    /// All entries, in the order they were stored.
    pub fn entries(&self) -> &[PakEntry] {
        &self.entries
    }

    /// Read the bytes of one entry.
    ///
    /// # Arguments
    ///
    /// * `entry` - An entry from [`entries()`](Self::entries)
    ///
    /// # Returns
    ///
    /// Exactly `entry.size()` bytes copied from the payload region.
    pub fn read_entry(&self, entry: &PakEntry) -> Result<Vec<u8>> {
        Self::validate_entry(entry, self.header.payload_end)?;
        let mut buf = vec![0u8; entry.size() as usize];
        self.reader.read_exact_at(u64::from(entry.start), &mut buf)?;
        Ok(buf)
    }
}
