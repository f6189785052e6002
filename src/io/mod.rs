mod fs;
mod local;
mod memory;

pub use fs::{ensure_dirs, list_files};
pub use local::LocalFileReader;
pub use memory::MemoryReader;

use crate::error::{PakError, Result};

/// Trait for random access reading from a data source
pub trait ReadAt {
    /// Read data at the specified offset into the buffer
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Fill `buf` completely from `offset`, failing if the source ends first.
    fn read_exact_at(&self, mut offset: u64, mut buf: &mut [u8]) -> Result<()> {
        while !buf.is_empty() {
            let n = self.read_at(offset, buf)?;
            if n == 0 {
                return Err(PakError::corrupt(format!(
                    "unexpected end of data at offset {offset}"
                )));
            }
            offset += n as u64;
            buf = &mut buf[n..];
        }
        Ok(())
    }
}
