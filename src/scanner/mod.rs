//! Scanner module for directory traversal and file fingerprinting.
//!
//! This module provides functionality for:
//! - Directory walking with literal prefix exclusions (jwalk)
//! - Sampled SHA-256 content fingerprints, or name-only fingerprints
//! - Home expansion and prefix matching for user-supplied paths
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Whole-file or middle-block fingerprinting
//! - [`path_utils`]: `~` expansion, absolutizing and literal prefix sets
//!
//! # Example
//!
//! ```no_run
//! use mediadupe::scanner::{Hasher, Walker, WalkerConfig};
//! use mediadupe::scanner::path_utils::PrefixSet;
//! use std::path::Path;
//!
//! let config = WalkerConfig::default()
//!     .with_exclusions(PrefixSet::new(["~/Movies/.cache"]));
//!
//! let hasher = Hasher::new();
//! let walker = Walker::new(Path::new("/srv/media"), config);
//! for file in walker.walk().flatten() {
//!     let outcome = hasher.fingerprint(&file.path, file.size);
//!     println!("{}: {:?}", file.path.display(), outcome.fingerprint());
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::path::PathBuf;
use std::sync::Arc;

// Re-export main types
pub use hasher::{
    hash_to_hex, Fingerprint, FingerprintMode, FingerprintOutcome, Hash, Hasher, BLOCK_SIZE,
    MAX_BLOCK_SIZE,
};
pub use path_utils::PrefixSet;
pub use walker::Walker;

/// A regular file discovered by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes at discovery time
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Paths starting with any of these prefixes are neither yielded nor descended into.
    pub exclusions: PrefixSet,
}

impl WalkerConfig {
    /// Create a configuration with the given exclusion prefixes.
    #[must_use]
    pub fn new(exclusions: PrefixSet) -> Self {
        Self { exclusions }
    }

    /// Replace the exclusion prefixes.
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: PrefixSet) -> Self {
        self.exclusions = exclusions;
        self
    }
}

/// Errors that can occur while reading the directory tree.
///
/// The walker logs these and keeps going; they are exposed for callers
/// that want to count them.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file or directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },
}

/// Reasons a file is skipped by the fingerprinter.
#[derive(thiserror::Error, Debug, Clone)]
pub enum HashError {
    /// The file vanished between discovery and reading.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path does not refer to a regular file.
    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    /// Name mode was asked to key a path without a final component.
    #[error("No file name: {0}")]
    NoFileName(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl HashError {
    /// The path this error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::NotAFile(p)
            | Self::NoFileName(p)
            | Self::Io { path: p, .. } => p,
        }
    }
}
