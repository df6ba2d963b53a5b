//! Content fingerprinting with sampled SHA-256.
//!
//! # Overview
//!
//! A fingerprint stands in for "same content". Small files are hashed in
//! full. Files of at least two blocks are identified by a single block
//! taken from just before the middle of the file:
//!
//! ```text
//! offset = size / 2 - block_size
//! bytes  = [offset, offset + block_size)
//! ```
//!
//! Two large files of equal size that agree on that block are reported as
//! duplicates even if they differ elsewhere. That is the accepted price for
//! not reading multi-gigabyte videos end to end.
//!
//! In name mode no content is read at all: the fingerprint is the file's
//! final path component, compared case-sensitively.
//!
//! # Example
//!
//! ```no_run
//! use mediadupe::scanner::{Hasher, FingerprintOutcome};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! match hasher.fingerprint(Path::new("clip.mov"), 4_000_000_000) {
//!     FingerprintOutcome::Ready(fp) => println!("{fp}"),
//!     FingerprintOutcome::Skipped(reason) => eprintln!("skipped: {reason}"),
//! }
//! ```

use std::ffi::OsString;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::HashError;

/// Size of the sampled block, and half the threshold for full-content hashing.
pub const BLOCK_SIZE: u64 = 131_072;

/// Largest accepted block size; twice this still fits in a `u64`.
pub const MAX_BLOCK_SIZE: u64 = u64::MAX / 2;

/// SHA-256 digest bytes.
pub type Hash = [u8; 32];

/// How files are keyed for duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FingerprintMode {
    /// Sampled SHA-256 of the content.
    #[default]
    Content,
    /// Base file name only, no content read.
    Name,
}

impl FingerprintMode {
    /// Pick the mode from a `--by-name` style flag.
    #[must_use]
    pub fn from_by_name(by_name: bool) -> Self {
        if by_name {
            Self::Name
        } else {
            Self::Content
        }
    }
}

/// Opaque identifier of a file's content (or name).
///
/// Equality is the only meaningful operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// Digest of the whole file or of its middle block.
    Content(Hash),
    /// Raw base name of the file.
    Name(OsString),
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content(hash) => f.write_str(&hash_to_hex(hash)),
            Self::Name(name) => write!(f, "{}", name.to_string_lossy()),
        }
    }
}

/// Result of fingerprinting one file.
///
/// `Skipped` carries the reason so the caller can count and log it; a
/// skipped file never enters the grouping index.
#[derive(Debug, Clone)]
pub enum FingerprintOutcome {
    /// The file was fingerprinted.
    Ready(Fingerprint),
    /// The file could not be read and is left out of grouping.
    Skipped(HashError),
}

impl FingerprintOutcome {
    /// Borrow the fingerprint, if there is one.
    #[must_use]
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        match self {
            Self::Ready(fp) => Some(fp),
            Self::Skipped(_) => None,
        }
    }

    /// Convert into a `Result`, e.g. for use with `?`.
    ///
    /// # Errors
    ///
    /// Returns the skip reason for a skipped file.
    pub fn into_result(self) -> Result<Fingerprint, HashError> {
        match self {
            Self::Ready(fp) => Ok(fp),
            Self::Skipped(e) => Err(e),
        }
    }
}

impl From<Result<Fingerprint, HashError>> for FingerprintOutcome {
    fn from(result: Result<Fingerprint, HashError>) -> Self {
        match result {
            Ok(fp) => Self::Ready(fp),
            Err(e) => Self::Skipped(e),
        }
    }
}

/// Stateless fingerprinter.
///
/// Holds only the mode and block size, so it is cheap to share across the
/// worker pool behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Hasher {
    mode: FingerprintMode,
    block_size: u64,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Content-mode hasher with the standard block size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: FingerprintMode::Content,
            block_size: BLOCK_SIZE,
        }
    }

    /// Set the fingerprinting mode.
    #[must_use]
    pub fn with_mode(mut self, mode: FingerprintMode) -> Self {
        self.mode = mode;
        self
    }

    /// Override the sampled block size, clamped to `1..=MAX_BLOCK_SIZE`.
    #[must_use]
    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = block_size.clamp(1, MAX_BLOCK_SIZE);
        self
    }

    /// The configured mode.
    #[must_use]
    pub fn mode(&self) -> FingerprintMode {
        self.mode
    }

    /// The configured block size in bytes.
    #[must_use]
    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Fingerprint `path`, using `size_hint` (normally the size from the walk)
    /// to pick between whole-file and sampled hashing.
    pub fn fingerprint(&self, path: &Path, size_hint: u64) -> FingerprintOutcome {
        let result = match self.mode {
            FingerprintMode::Content => self
                .content_hash(path, size_hint)
                .map(Fingerprint::Content),
            FingerprintMode::Name => name_key(path),
        };
        result.into()
    }

    /// Compute the content digest used in content mode.
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`] when the file cannot be opened, is not a
    /// regular file, or a read fails.
    pub fn content_hash(&self, path: &Path, size_hint: u64) -> Result<Hash, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;

        let metadata = file.metadata().map_err(|e| HashError::from_io(path, e))?;
        if !metadata.is_file() {
            return Err(HashError::NotAFile(path.to_path_buf()));
        }

        let mut sha = Sha256::new();

        if size_hint < self.block_size.saturating_mul(2) {
            io::copy(&mut file, &mut sha).map_err(|e| HashError::from_io(path, e))?;
        } else {
            let offset = (size_hint / 2).saturating_sub(self.block_size);
            log::trace!(
                "Sampling {} bytes at offset {} of {}",
                self.block_size,
                offset,
                path.display()
            );
            file.seek(SeekFrom::Start(offset))
                .map_err(|e| HashError::from_io(path, e))?;
            io::copy(&mut (&mut file).take(self.block_size), &mut sha)
                .map_err(|e| HashError::from_io(path, e))?;
        }

        Ok(sha.finalize().into())
    }
}

/// Name-mode key: the last path component.
fn name_key(path: &Path) -> Result<Fingerprint, HashError> {
    path.file_name()
        .map(|name| Fingerprint::Name(name.to_os_string()))
        .ok_or_else(|| HashError::NoFileName(path.to_path_buf()))
}

/// Convert a digest to a lowercase hexadecimal string.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    use std::fmt::Write;
    hash.iter().fold(String::with_capacity(64), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

impl HashError {
    /// Classify an I/O error raised while fingerprinting `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: Arc::new(error),
            },
        }
    }
}
