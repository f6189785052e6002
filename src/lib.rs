//! # pakpack
//!
//! Pack a directory tree into a single `.pak` container and extract it again.
//!
//! A container stores every file's bytes uncompressed, one after another,
//! followed by a zlib-compressed directory block that maps each relative
//! path to its byte range. See [`pak`] for the exact layout.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use pakpack::{default_archive_path, extract_archive, pack_directory};
//!
//! fn main() -> pakpack::Result<()> {
//!     let root = Path::new("assets");
//!     let archive = default_archive_path(root);
//!
//!     let summary = pack_directory(root, &archive, |entry| println!("{}", entry.name))?;
//!     println!("{} files", summary.entries.len());
//!
//!     extract_archive(&archive, Path::new("assets-copy"), false, |_| {})?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod pak;

pub use cli::Cli;
pub use error::{PakError, Result};
pub use io::{LocalFileReader, MemoryReader, ReadAt};
pub use pak::{
    PackSummary, PakEntry, PakExtractor, PakHeader, PakReader, PakWriter, default_archive_path,
    default_output_dir, extract_archive, pack_directory,
};
