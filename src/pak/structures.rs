use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read};
use std::path::PathBuf;

use crate::error::{PakError, Result};

/// Magic value at offset 0 (`"PAK\x01"` in little-endian byte order).
pub const MAGIC: u32 = 0x014B_4150;

/// Default file extension for containers.
pub const PAK_EXTENSION: &str = "pak";

/// Fixed container header - 16 bytes
///
/// | offset | field |
/// |---|---|
/// | 0 | magic |
/// | 4 | payload end / directory block start |
/// | 8 | directory block size, uncompressed |
/// | 12 | directory block size, compressed |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PakHeader {
    pub payload_end: u32,
    pub directory_size: u32,
    pub directory_compressed_size: u32,
}

impl PakHeader {
    pub const SIZE: usize = 16;

    /// Parse the header, checking the magic first.
    ///
    /// `data` may be shorter than [`Self::SIZE`] when the file itself is; a
    /// short buffer with the wrong magic is still reported as a magic error.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut magic = [0u8; 4];
        let n = data.len().min(4);
        magic[..n].copy_from_slice(&data[..n]);
        let found = u32::from_le_bytes(magic);
        if n < 4 || found != MAGIC {
            return Err(PakError::InvalidMagic { found });
        }

        if data.len() < Self::SIZE {
            return Err(PakError::corrupt(format!(
                "header truncated to {} bytes",
                data.len()
            )));
        }

        let mut cursor = Cursor::new(&data[4..Self::SIZE]);
        Ok(Self {
            payload_end: cursor.read_u32::<LittleEndian>()?,
            directory_size: cursor.read_u32::<LittleEndian>()?,
            directory_compressed_size: cursor.read_u32::<LittleEndian>()?,
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        out[4..8].copy_from_slice(&self.payload_end.to_le_bytes());
        out[8..12].copy_from_slice(&self.directory_size.to_le_bytes());
        out[12..16].copy_from_slice(&self.directory_compressed_size.to_le_bytes());
        out
    }
}

/// One file in the directory block.
///
/// `start` and `end` are absolute offsets into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PakEntry {
    pub name: String,
    pub start: u32,
    pub end: u32,
}

impl PakEntry {
    pub fn size(&self) -> u32 {
        self.end - self.start
    }

    /// Path of this entry relative to the extraction root.
    ///
    /// Both `/` and `\` count as separators.
    pub fn relative_path(&self) -> Result<PathBuf> {
        Ok(name_components(&self.name)?.into_iter().collect())
    }
}

/// Split an entry name into path components, rejecting anything that could
/// land outside the extraction root.
pub fn name_components(name: &str) -> Result<Vec<&str>> {
    let unsafe_path = || PakError::UnsafePath {
        name: name.to_string(),
    };

    if name.is_empty() {
        return Err(unsafe_path());
    }

    let components: Vec<&str> = name.split(['/', '\\']).collect();
    for (i, component) in components.iter().enumerate() {
        if component.is_empty() || *component == "." || *component == ".." {
            return Err(unsafe_path());
        }
        // Drive prefix such as "C:"
        if i == 0 && component.ends_with(':') {
            return Err(unsafe_path());
        }
    }
    Ok(components)
}

/// The index of all entries, stored zlib-compressed after the payload.
///
/// Layout: `u32` count, then per entry `u32` name length, name bytes,
/// `u32` start, `u32` end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryBlock {
    pub entries: Vec<PakEntry>,
}

impl DirectoryBlock {
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.write_u32::<LittleEndian>(to_u32(self.entries.len() as u64)?)?;
        for entry in &self.entries {
            if !entry.name.is_ascii() {
                return Err(PakError::NonAsciiName {
                    name: entry.name.clone(),
                });
            }
            out.write_u32::<LittleEndian>(to_u32(entry.name.len() as u64)?)?;
            out.extend_from_slice(entry.name.as_bytes());
            out.write_u32::<LittleEndian>(entry.start)?;
            out.write_u32::<LittleEndian>(entry.end)?;
        }
        Ok(out)
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let count = read_u32(&mut cursor, "entry count")?;

        // Every entry takes at least 12 bytes, so a huge count is caught
        // before allocating for it.
        let remaining = data.len() as u64 - cursor.position();
        if u64::from(count) * 12 > remaining {
            return Err(PakError::corrupt(format!(
                "directory claims {count} entries but holds only {remaining} bytes"
            )));
        }

        let mut entries = Vec::with_capacity(count as usize);
        for i in 0..count {
            let name_len = read_u32(&mut cursor, "name length")? as u64;
            let remaining = data.len() as u64 - cursor.position();
            if name_len > remaining {
                return Err(PakError::corrupt(format!(
                    "entry {i}: name length {name_len} exceeds directory block"
                )));
            }

            let mut name_bytes = vec![0u8; name_len as usize];
            cursor
                .read_exact(&mut name_bytes)
                .map_err(|_| PakError::corrupt(format!("entry {i}: truncated name")))?;
            if !name_bytes.is_ascii() {
                return Err(PakError::corrupt(format!("entry {i}: name is not ASCII")));
            }
            // ASCII is always valid UTF-8
            let name = String::from_utf8(name_bytes)
                .map_err(|_| PakError::corrupt(format!("entry {i}: name is not ASCII")))?;

            let start = read_u32(&mut cursor, "start offset")?;
            let end = read_u32(&mut cursor, "end offset")?;
            entries.push(PakEntry { name, start, end });
        }

        if cursor.position() != data.len() as u64 {
            return Err(PakError::corrupt(format!(
                "{} trailing bytes after directory entries",
                data.len() as u64 - cursor.position()
            )));
        }

        Ok(Self { entries })
    }
}

fn read_u32(cursor: &mut Cursor<&[u8]>, what: &str) -> Result<u32> {
    cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| PakError::corrupt(format!("directory block truncated reading {what}")))
}

/// Narrow a size or offset to the 32-bit on-disk width.
pub(crate) fn to_u32(value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| PakError::TooLarge { size: value })
}
