//! Error types for pak operations.

use std::io;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, PakError>;

/// Everything that can abort a pack or extract.
#[derive(Debug, Error)]
pub enum PakError {
    /// I/O error from the underlying file or stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The first four bytes are not the pak magic.
    #[error("Not a recognized pak container (magic {found:#010x})")]
    InvalidMagic {
        /// Magic value actually read.
        found: u32,
    },

    /// Header, directory block or entry offsets are inconsistent.
    #[error("Corrupt archive: {message}")]
    Corrupt {
        /// Description of what failed to validate.
        message: String,
    },

    /// Entry names are stored as single-byte ASCII.
    #[error("File name is not ASCII and cannot be stored: {name}")]
    NonAsciiName {
        /// The offending relative path.
        name: String,
    },

    /// Offsets are 32-bit; the payload would not fit.
    #[error("Archive too large: {size} bytes exceeds the 32-bit offset limit")]
    TooLarge {
        /// Size the archive would have reached.
        size: u64,
    },

    /// Entry name would resolve outside the destination directory.
    #[error("Unsafe entry path: {name}")]
    UnsafePath {
        /// The rejected entry name.
        name: String,
    },

    /// Destination file already exists and overwriting was not requested.
    #[error("Refusing to overwrite existing file: {path}")]
    AlreadyExists {
        /// Path of the existing file.
        path: String,
    },
}

impl PakError {
    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        PakError::Corrupt {
            message: message.into(),
        }
    }
}
