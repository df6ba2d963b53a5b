//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for enumerating every regular
//! file below a root directory. Directories are traversed, never yielded.
//!
//! # Features
//!
//! - Parallel directory reads via [`jwalk`], with children sorted by name so
//!   the discovery order is the same on every run and platform
//! - Literal prefix exclusions, pruned while reading each directory so an
//!   excluded subtree is never entered
//! - Symlinks are not followed into directories; a link to a regular file is
//!   reported like the file itself
//! - Graceful shutdown via atomic flag
//!
//! No symlink cycle detection is done. Links to directories are never
//! followed, so cycles cannot occur through them.
//!
//! # Example
//!
//! ```no_run
//! use mediadupe::scanner::{Walker, WalkerConfig, PrefixSet};
//! use std::path::Path;
//!
//! let config = WalkerConfig::new(PrefixSet::new(["~/Movies/Exports"]));
//! let walker = Walker::new(Path::new("/home/user/Movies"), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jwalk::WalkDir;

use super::path_utils::absolutize;
use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for file discovery.
///
/// Each call to [`Walker::walk`] starts a fresh traversal.
#[derive(Debug)]
pub struct Walker {
    /// Absolute root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// A relative root is made absolute against the current directory so
    /// every yielded path is absolute.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: absolutize(path),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker will stop iteration
    /// as soon as possible.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// The absolute root this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the directory tree, yielding regular files.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. A root that does not exist, is not a directory, or is
    /// itself excluded produces an empty sequence.
    pub fn walk(&self) -> Box<dyn Iterator<Item = Result<FileEntry, ScanError>> + '_> {
        if !self.root.is_dir() {
            log::warn!(
                "Root {} is missing or not a directory, nothing to walk",
                self.root.display()
            );
            return Box::new(std::iter::empty());
        }

        if self.config.exclusions.matches(&self.root) {
            log::info!("Root {} is excluded, nothing to walk", self.root.display());
            return Box::new(std::iter::empty());
        }

        let exclusions = self.config.exclusions.clone();

        let walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .skip_hidden(false)
            .process_read_dir(move |_depth, _path, _read_dir_state, children| {
                // Prune excluded entries so excluded directories are never read
                if !exclusions.is_empty() {
                    children.retain(|child| match child {
                        Ok(entry) => {
                            let path = entry.path();
                            if exclusions.matches(&path) {
                                log::trace!("Excluded: {}", path.display());
                                false
                            } else {
                                true
                            }
                        }
                        Err(_) => true,
                    });
                }

                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        let entries = walk_dir.into_iter().take_while(move |_| {
            let stop = self.is_shutdown_requested();
            if stop {
                log::debug!("Walker: Shutdown requested, stopping iteration");
            }
            !stop
        });

        Box::new(entries.filter_map(move |entry_result| {
            match entry_result {
                Ok(entry) => {
                    // Skip the root directory itself
                    if entry.depth == 0 {
                        return None;
                    }

                    let path = entry.path();
                    let file_type = entry.file_type();

                    if file_type.is_dir() {
                        return None;
                    }

                    if file_type.is_symlink() {
                        return self.process_symlink(path);
                    }

                    match fs::symlink_metadata(&path) {
                        Ok(metadata) if metadata.is_file() => {
                            log::debug!("Found: {}", path.display());
                            Some(Ok(FileEntry::new(path, metadata.len())))
                        }
                        Ok(_) => {
                            log::trace!("Skipping special file: {}", path.display());
                            None
                        }
                        Err(e) => Some(Self::handle_io_error(&path, e)),
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    Some(Self::handle_jwalk_error(path, e))
                }
            }
        }))
    }

    /// Report a symlink only when it resolves to a regular file.
    fn process_symlink(&self, path: PathBuf) -> Option<Result<FileEntry, ScanError>> {
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => {
                log::debug!("Found: {} (symlink)", path.display());
                Some(Ok(FileEntry::new(path, metadata.len())))
            }
            Ok(_) => {
                log::trace!("Not following directory symlink: {}", path.display());
                None
            }
            Err(e) => {
                log::debug!("Skipping dangling symlink {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(path: &Path, error: std::io::Error) -> Result<FileEntry, ScanError> {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                Err(ScanError::PermissionDenied(path.to_path_buf()))
            }
            ErrorKind::NotFound => {
                log::debug!("File not found (may have been deleted): {}", path.display());
                Err(ScanError::NotFound(path.to_path_buf()))
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
                Err(ScanError::Io {
                    path: path.to_path_buf(),
                    source: Arc::new(error),
                })
            }
        }
    }

    /// Handle jwalk errors (typically unreadable directories).
    fn handle_jwalk_error(path: PathBuf, error: jwalk::Error) -> Result<FileEntry, ScanError> {
        log::warn!("Walker error for {}: {}", path.display(), error);
        Err(ScanError::Io {
            path,
            source: Arc::new(std::io::Error::other(error.to_string())),
        })
    }
}
