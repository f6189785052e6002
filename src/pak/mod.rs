//! Pak container format.
//!
//! A pak file bundles a directory tree into one file:
//!
//! 1. A 16-byte header (magic, payload end, directory block sizes)
//! 2. The raw bytes of every file, back to back, uncompressed
//! 3. The directory block, zlib-compressed as a single unit
//!
//! The directory block lists each file's name with its absolute start and
//! end offsets. All integers are little-endian `u32`.
//!
//! - [`structures`]: header, entry and directory block layout
//! - [`codec`]: zlib compression of the directory block
//! - [`writer`]: building containers
//! - [`parser`]: validating and reading containers
//! - [`extractor`]: writing entries back to disk
//!
//! ## Limitations
//!
//! - Names are ASCII only; packing a non-ASCII path fails
//! - Offsets are 32-bit, so archives are capped at 4 GiB
//! - The directory block and each file are held in memory whole
//! - A failed pack may leave a partial archive behind

pub mod codec;
mod extractor;
mod parser;
mod structures;
mod writer;

pub use extractor::{PakExtractor, default_output_dir, extract_archive};
pub use parser::PakReader;
pub use structures::*;
pub use writer::{PackSummary, PakWriter, default_archive_path, pack_directory};
