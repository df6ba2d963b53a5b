//! JSON output for scan and removal results.
//!
//! # Output Schema
//!
//! `find`:
//!
//! ```json
//! {
//!   "groups": [
//!     {
//!       "fingerprint": "ab12...",
//!       "size": 1024,
//!       "files": ["/a/clip.mov", "/b/clip.mov"]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "total_size": 1048576,
//!     "skipped_files": 0,
//!     "scan_errors": 0,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 1024,
//!     "scan_duration_ms": 1234,
//!     "exit_code": 0,
//!     "exit_code_name": "MD000"
//!   }
//! }
//! ```
//!
//! `remove` adds `remove_prefix`, `removals`, and `dry_run`, plus `trashed`
//! and `failed` once deletion has run.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::actions::BatchDeleteResult;
use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::error::ExitCode;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Hex digest, or the shared base name in name mode
    pub fingerprint: String,
    /// Size of the first member in bytes
    pub size: u64,
    /// Member paths in discovery order
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a [`DuplicateGroup`].
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            fingerprint: group.fingerprint.to_string(),
            size: group.files.first().map_or(0, |f| f.size),
            files: group.files.iter().map(|f| path_string(&f.path)).collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Regular files discovered by the walk
    pub total_files: usize,
    /// Total size of the discovered files in bytes
    pub total_size: u64,
    /// Files skipped because they could not be read
    pub skipped_files: usize,
    /// Non-fatal walk errors
    pub scan_errors: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Duplicate copies beyond the first of each group
    pub duplicate_files: usize,
    /// Bytes held by those copies
    pub reclaimable_space: u64,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "MD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a [`ScanSummary`] and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            skipped_files: summary.skipped_files.len(),
            scan_errors: summary.scan_errors.len(),
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// JSON document for `find`.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Duplicate groups in discovery order
    pub groups: Vec<JsonDuplicateGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from duplicate groups, summary and exit code.
    ///
    /// # Example
    ///
    /// ```
    /// use mediadupe::duplicates::ScanSummary;
    /// use mediadupe::error::ExitCode;
    /// use mediadupe::output::json::JsonOutput;
    ///
    /// let output = JsonOutput::new(&[], &ScanSummary::default(), ExitCode::NoDuplicates);
    /// assert!(output.groups.is_empty());
    /// assert_eq!(output.summary.exit_code, 2);
    /// ```
    #[must_use]
    pub fn new(groups: &[DuplicateGroup], summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            groups: groups
                .iter()
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        write_json(self, writer, pretty)
    }
}

/// JSON document for `remove`.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRemovalOutput {
    /// The removal-eligible prefix as given (after home expansion)
    pub remove_prefix: String,
    /// Paths selected for removal, in group order
    pub removals: Vec<String>,
    /// Whether deletion was skipped
    pub dry_run: bool,
    /// Paths moved to the trash
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trashed: Vec<String>,
    /// Paths that could not be trashed, with the error message
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<JsonFailure>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

/// One failed deletion.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFailure {
    /// Path that could not be trashed
    pub path: String,
    /// Error message
    pub error: String,
}

impl JsonRemovalOutput {
    /// Create a removal document.
    #[must_use]
    pub fn new(
        remove_prefix: &Path,
        removals: &[PathBuf],
        summary: &ScanSummary,
        exit_code: ExitCode,
    ) -> Self {
        Self {
            remove_prefix: path_string(remove_prefix),
            removals: removals.iter().map(|p| path_string(p)).collect(),
            dry_run: false,
            trashed: Vec::new(),
            failed: Vec::new(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Mark the document as a dry run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Attach the outcome of the deletion batch.
    #[must_use]
    pub fn with_batch(mut self, batch: &BatchDeleteResult) -> Self {
        self.trashed = batch.successes.iter().map(|s| path_string(&s.path)).collect();
        self.failed = batch
            .failures
            .iter()
            .map(|(path, error)| JsonFailure {
                path: path_string(path),
                error: error.clone(),
            })
            .collect();
        self
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        write_json(self, writer, pretty)
    }
}

fn write_json<T: Serialize, W: Write>(
    value: &T,
    writer: &mut W,
    pretty: bool,
) -> Result<(), JsonOutputError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

// Paths are reported as walked, not canonicalized.
fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
