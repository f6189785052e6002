use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "pakpack")]
#[command(version)]
#[command(about = "Pack a directory into a single .pak archive and extract it again", long_about = None)]
#[command(after_help = "Examples:\n  \
  pakpack pack assets            write assets.pak next to the assets directory\n  \
  pakpack x assets.pak           extract into ./assets\n  \
  pakpack list -v assets.pak     show every entry with its offsets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Quiet mode, no per-file messages
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Log level for diagnostics on stderr
    #[arg(long, value_enum, global = true, default_value = "warn")]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pack a directory into an archive
    #[command(alias = "p")]
    Pack {
        /// Directory to pack
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Archive to write (default: <DIR>.pak)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Extract an archive into a directory
    #[command(alias = "x")]
    Extract {
        /// Archive to extract
        #[arg(value_name = "FILE")]
        archive: PathBuf,

        /// Extract into DIR (default: archive name without extension)
        #[arg(short = 'd', long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(short = 'o', long)]
        overwrite: bool,
    },

    /// List the entries of an archive
    #[command(alias = "l")]
    List {
        /// Archive to list
        #[arg(value_name = "FILE")]
        archive: PathBuf,

        /// Show offsets and sizes
        #[arg(short = 'v', long)]
        verbose: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}
