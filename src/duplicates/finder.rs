//! Duplicate finder: walk, fingerprint, group, and optionally select removals.
//!
//! # Overview
//!
//! This module orchestrates the detection pipeline:
//! 1. **Walk** - Collect regular files below the root, minus exclusions
//! 2. **Fingerprint** - Sampled SHA-256 (or base name) per file on a bounded
//!    rayon pool; unreadable files are skipped and counted
//! 3. **Group** - Insert fingerprints into a [`GroupingIndex`] in discovery
//!    order and keep buckets of two or more
//! 4. **Select** (optional) - Apply the removal policy for one prefix
//!
//! Per-file problems never fail a scan. The only error a scan returns is
//! [`FinderError::Interrupted`].
//!
//! # Example
//!
//! ```no_run
//! use mediadupe::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(4));
//! let (groups, summary) = finder.find_duplicates(Path::new("/srv/media")).unwrap();
//!
//! for group in &groups {
//!     println!("{:?}", group.paths());
//! }
//! println!("Reclaimable: {}", summary.reclaimable_display());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::groups::{DuplicateGroup, GroupingIndex};
use super::policy::{plan_removals, RemovalPlan};
use crate::progress::{ProgressCallback, PHASE_FINGERPRINT, PHASE_WALK};
use crate::scanner::{
    FileEntry, FingerprintMode, FingerprintOutcome, HashError, Hasher, ScanError, Walker,
    WalkerConfig, BLOCK_SIZE, MAX_BLOCK_SIZE,
};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of worker threads for fingerprinting.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Content or name fingerprints.
    pub mode: FingerprintMode,
    /// Sampled block size for large files.
    pub block_size: u64,
    /// Walker configuration (exclusions).
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("mode", &self.mode)
            .field("block_size", &self.block_size)
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            mode: FingerprintMode::Content,
            block_size: BLOCK_SIZE,
            walker_config: WalkerConfig::default(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the fingerprinting thread count (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the fingerprinting mode.
    #[must_use]
    pub fn with_mode(mut self, mode: FingerprintMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the sampled block size, clamped to `1..=MAX_BLOCK_SIZE`.
    #[must_use]
    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = block_size.clamp(1, MAX_BLOCK_SIZE);
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Number of regular files discovered by the walk
    pub total_files: usize,
    /// Total size of the discovered files in bytes
    pub total_size: u64,
    /// Files that received a fingerprint
    pub fingerprinted_files: usize,
    /// Files left out because they could not be read
    pub skipped_files: Vec<HashError>,
    /// Non-fatal errors hit while walking
    pub scan_errors: Vec<ScanError>,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Number of duplicate copies (group members beyond the first)
    pub duplicate_files: usize,
    /// Space held by duplicate copies
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        bytesize::ByteSize(self.total_size).to_string()
    }

    fn record_groups(&mut self, groups: &[DuplicateGroup]) {
        self.duplicate_groups = groups.len();
        self.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        self.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
    }
}

/// Result of a scan followed by removal selection.
#[derive(Debug, Clone, Default)]
pub struct RemovalScan {
    /// Duplicate groups the selection was made from
    pub groups: Vec<DuplicateGroup>,
    /// Per-group keep/remove split, parallel to `groups`
    pub plans: Vec<RemovalPlan>,
    /// Flat list of paths to remove, in group order
    pub removals: Vec<PathBuf>,
    /// Scan statistics
    pub summary: ScanSummary,
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Duplicate finder that runs the walk, fingerprint, and group pipeline.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Arc<Hasher>,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let hasher = Hasher::new()
            .with_mode(config.mode)
            .with_block_size(config.block_size);
        Self {
            config,
            hasher: Arc::new(hasher),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The configuration this finder was built with.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Check that `path` is an existing directory.
    ///
    /// The pipeline itself treats a bad root as an empty tree; callers that
    /// want a distinct diagnostic call this first.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::PathNotFound`] or [`FinderError::NotADirectory`].
    pub fn check_root(path: &Path) -> Result<(), FinderError> {
        if !path.exists() {
            return Err(FinderError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }
        Ok(())
    }

    /// Find all duplicate groups below `root`.
    ///
    /// A missing or unreadable root yields no groups.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if the shutdown flag is raised.
    pub fn find_duplicates(
        &self,
        root: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();

        log::info!("Starting duplicate scan of {}", root.display());

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let files = self.collect_files(root, &mut summary);

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let groups = self.group_files(files, &mut summary)?;
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        );

        Ok((groups, summary))
    }

    /// Find duplicates among an already collected list of files.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if the shutdown flag is raised.
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileEntry>,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary {
            total_files: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
            ..Default::default()
        };

        let groups = self.group_files(files, &mut summary)?;
        summary.scan_duration = start_time.elapsed();
        Ok((groups, summary))
    }

    /// Scan `root` and select the copies under `removal_prefix` that can go.
    ///
    /// `removal_prefix` is compared literally; expand and absolutize it first
    /// (see [`crate::scanner::path_utils::normalize_input`]).
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if the shutdown flag is raised.
    pub fn find_removals(
        &self,
        root: &Path,
        removal_prefix: &Path,
    ) -> Result<RemovalScan, FinderError> {
        let (groups, summary) = self.find_duplicates(root)?;
        let plans = plan_removals(&groups, removal_prefix);
        let removals: Vec<PathBuf> = plans.iter().flat_map(|p| p.remove.clone()).collect();

        log::info!(
            "{} of {} redundant copies selected for removal under {}",
            removals.len(),
            summary.duplicate_files,
            removal_prefix.display()
        );

        Ok(RemovalScan {
            groups,
            plans,
            removals,
            summary,
        })
    }

    fn collect_files(&self, root: &Path, summary: &mut ScanSummary) -> Vec<FileEntry> {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_WALK, 0);
        }

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        let mut files = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(file) => {
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(files.len() + 1, &file.path.to_string_lossy());
                    }
                    summary.total_size += file.size;
                    files.push(file);
                }
                Err(e) => summary.scan_errors.push(e),
            }
        }
        summary.total_files = files.len();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_WALK);
        }

        log::info!(
            "Found {} files ({} total)",
            summary.total_files,
            summary.total_size_display()
        );

        files
    }

    fn group_files(
        &self,
        files: Vec<FileEntry>,
        summary: &mut ScanSummary,
    ) -> Result<Vec<DuplicateGroup>, FinderError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let outcomes = self.fingerprint_all(files);

        if self.config.is_shutdown_requested() {
            log::info!("Fingerprinting interrupted by shutdown signal");
            return Err(FinderError::Interrupted);
        }

        let mut ready = Vec::with_capacity(outcomes.len());
        for (file, outcome) in outcomes {
            match outcome {
                Some(outcome) => ready.push((file, outcome)),
                None => return Err(FinderError::Interrupted),
            }
        }

        let (index, skipped) = GroupingIndex::from_outcomes(ready);
        summary.skipped_files = skipped;
        summary.fingerprinted_files = index.total_files();

        let (groups, stats) = index.into_duplicate_groups();
        log::info!(
            "Grouping complete: {} files, {} distinct fingerprints, {} duplicate groups",
            stats.total_files,
            stats.unique_fingerprints,
            stats.duplicate_groups
        );

        summary.record_groups(&groups);
        Ok(groups)
    }

    /// Fingerprint every file, returning results in input order.
    ///
    /// `None` marks files that were not processed because of shutdown.
    fn fingerprint_all(
        &self,
        files: Vec<FileEntry>,
    ) -> Vec<(FileEntry, Option<FingerprintOutcome>)> {
        let total = files.len();
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_FINGERPRINT, total);
        }

        log::info!(
            "Fingerprinting {} files ({:?} mode, {} threads)",
            total,
            self.config.mode,
            self.config.io_threads
        );

        let done = AtomicUsize::new(0);
        let work = |file: FileEntry| {
            if self.config.is_shutdown_requested() {
                return (file, None);
            }
            let outcome = self.hasher.fingerprint(&file.path, file.size);
            let current = done.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref callback) = self.config.progress_callback {
                callback.on_progress(current, &file.path.to_string_lossy());
            }
            (file, Some(outcome))
        };

        let results = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()
        {
            Ok(pool) => pool.install(|| files.into_par_iter().map(work).collect()),
            Err(e) => {
                log::warn!("Failed to create thread pool ({}), fingerprinting sequentially", e);
                files.into_iter().map(work).collect()
            }
        };

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_FINGERPRINT);
        }

        results
    }
}
