//! zlib codec for the directory block.

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use std::io::{Read, Write};
use tracing::trace;

use crate::error::{PakError, Result};

/// Compress `data` as a single zlib stream at the default level.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    trace!("compressed {} -> {} bytes", data.len(), compressed.len());
    Ok(compressed)
}

/// Decompress a zlib stream that must inflate to exactly `expected_len` bytes.
pub fn decompress(data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    // The expected size comes from the header; deflate cannot expand more
    // than about 1032:1, so don't reserve beyond that.
    let mut out = Vec::with_capacity(expected_len.min(data.len().saturating_mul(1032)));
    // One byte past the expected size is enough to detect an overrun.
    ZlibDecoder::new(data)
        .take(expected_len as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| PakError::corrupt(format!("directory block does not inflate: {e}")))?;

    if out.len() != expected_len {
        return Err(PakError::corrupt(format!(
            "directory block inflated to {} bytes, header says {expected_len}",
            out.len()
        )));
    }
    Ok(out)
}
