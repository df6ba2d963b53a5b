//! Command-line interface definitions.
//!
//! Global options (verbosity, color, error format, config file) apply to
//! every subcommand.
//!
//! # Example
//!
//! ```bash
//! # Report duplicate groups
//! mediadupe find --search-dir ~/Videos
//!
//! # Skip a directory, compare by file name
//! mediadupe find --search-dir ~/Videos --exclude-prefix ~/Videos/raw --by-name
//!
//! # Trash copies that live under ~/Downloads
//! mediadupe remove --search-dir ~ --remove-prefix ~/Downloads
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::scanner::MAX_BLOCK_SIZE;

/// Find duplicate media files and move redundant copies to the trash.
///
/// Large files are compared by a SHA-256 of one block from their middle,
/// small files by a SHA-256 of their whole content.
#[derive(Debug, Parser)]
#[command(name = "mediadupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report every group of duplicate files
    Find(FindArgs),
    /// Move duplicates under a prefix to the trash
    Remove(RemoveArgs),
}

/// Options shared by `find` and `remove`.
#[derive(Debug, Clone, Args)]
pub struct ScanOptions {
    /// Directory to search for duplicates (`~` is expanded)
    #[arg(long, value_name = "DIR")]
    pub search_dir: String,

    /// Skip every path starting with this prefix (repeatable, `~` is expanded)
    ///
    /// Matching is a plain string prefix: `/data/a` also skips `/data/ab`.
    #[arg(long = "exclude-prefix", value_name = "PREFIX")]
    pub exclude_prefixes: Vec<String>,

    /// Detect duplicates by file name instead of content
    #[arg(long)]
    pub by_name: bool,

    /// Number of I/O threads for fingerprinting (default: 4)
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(usize))]
    pub io_threads: Option<usize>,

    /// Size of the sampled block for large files (e.g. 128KiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub block_size: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the find subcommand.
#[derive(Debug, Args)]
pub struct FindArgs {
    #[command(flatten)]
    pub scan: ScanOptions,
}

/// Arguments for the remove subcommand.
#[derive(Debug, Args)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub scan: ScanOptions,

    /// Copies starting with this prefix may be removed (`~` is expanded)
    #[arg(long, value_name = "PREFIX")]
    pub remove_prefix: String,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print what would be removed without touching anything
    #[arg(long, conflicts_with = "yes")]
    pub dry_run: bool,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB. Case-insensitive.
/// Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use mediadupe::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("128KiB").unwrap(), 131_072);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// an unknown suffix, or amounts to zero bytes or more than
/// [`MAX_BLOCK_SIZE`].
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    // Whole numbers stay exact; fractions go through f64, which saturates.
    let bytes = match num_str.parse::<u64>() {
        Ok(whole) => whole.saturating_mul(multiplier),
        Err(_) => {
            let num: f64 = num_str
                .parse()
                .map_err(|_| format!("Invalid number: '{num_str}'"))?;
            (num * multiplier as f64) as u64
        }
    };
    if bytes == 0 {
        return Err("Size must be at least 1 byte".to_string());
    }
    if bytes > MAX_BLOCK_SIZE {
        return Err(format!("Size must be at most {MAX_BLOCK_SIZE} bytes"));
    }
    Ok(bytes)
}
