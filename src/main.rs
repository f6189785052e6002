//! Main entry point for the pakpack CLI application.
//!
//! Packs a directory into a `.pak` container, extracts one, or lists its
//! entries. Any failure is reported on stderr with a non-zero exit code.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::Path;
use tracing::Level;

use pakpack::cli::{Cli, Command};
use pakpack::{
    LocalFileReader, PakReader, default_archive_path, default_output_dir, extract_archive,
    pack_directory,
};

/// Application entry point.
///
/// Parses command-line arguments, sets up logging and dispatches to the
/// handler for the chosen verb.
fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Pack { dir, output } => {
            let output = output.clone().unwrap_or_else(|| default_archive_path(dir));
            pack(dir, &output, cli.quiet)
        }
        Command::Extract {
            archive,
            dir,
            overwrite,
        } => {
            let dest = dir.clone().unwrap_or_else(|| default_output_dir(archive));
            extract(archive, &dest, *overwrite, cli.quiet)
        }
        Command::List { archive, verbose } => list(archive, *verbose),
    }
}

/// Pack `dir` into `output`, printing one line per file unless quiet.
fn pack(dir: &Path, output: &Path, quiet: bool) -> Result<()> {
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }

    let summary = pack_directory(dir, output, |entry| {
        if !quiet {
            println!("Packing '{}'.", entry.name);
        }
    })
    .with_context(|| format!("Failed to pack {} into {}", dir.display(), output.display()))?;

    if !quiet {
        println!(
            "Packed {} files ({}) into {}",
            summary.entries.len(),
            format_size(summary.total_size()),
            summary.output.display()
        );
    }
    Ok(())
}

/// Extract `archive` under `dest`.
fn extract(archive: &Path, dest: &Path, overwrite: bool, quiet: bool) -> Result<()> {
    let written = extract_archive(archive, dest, overwrite, |entry| {
        if !quiet {
            println!("Extracting file '{}'.", entry.name);
        }
    })
    .with_context(|| format!("Failed to extract {}", archive.display()))?;

    if !quiet {
        println!("Extracted {} files into {}", written.len(), dest.display());
    }
    Ok(())
}

/// List the entries of `archive`.
///
/// The verbose format shows each entry's byte range and a totals line.
fn list(archive: &Path, verbose: bool) -> Result<()> {
    let reader = LocalFileReader::new(archive)
        .and_then(PakReader::open)
        .with_context(|| format!("Failed to read {}", archive.display()))?;

    if verbose {
        println!("{:>10}  {:>10}  {:>10}  Name", "Start", "End", "Length");
        println!("{}", "-".repeat(50));
    }

    let mut total = 0u64;
    for entry in reader.entries() {
        if verbose {
            println!(
                "{:>10}  {:>10}  {:>10}  {}",
                entry.start,
                entry.end,
                entry.size(),
                entry.name
            );
            total += u64::from(entry.size());
        } else {
            println!("{}", entry.name);
        }
    }

    if verbose {
        let header = reader.header();
        println!("{}", "-".repeat(50));
        println!(
            "{:>34}  {} files, directory {} -> {} bytes",
            total,
            reader.entries().len(),
            header.directory_size,
            header.directory_compressed_size
        );
    }

    Ok(())
}

/// Format a byte size into a human-readable string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
