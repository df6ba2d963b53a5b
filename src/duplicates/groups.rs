//! Fingerprint grouping and duplicate group management.
//!
//! # Overview
//!
//! The [`GroupingIndex`] maps each fingerprint to the files that produced
//! it, in the order they were inserted. It is built fresh for every scan
//! and owned by whoever runs the scan.
//!
//! Buckets are also kept in order of first appearance, so reports list
//! groups in the same order every time the same tree is scanned.
//!
//! # Example
//!
//! ```
//! use mediadupe::duplicates::GroupingIndex;
//! use mediadupe::scanner::{FileEntry, Fingerprint};
//! use std::path::PathBuf;
//!
//! let mut index = GroupingIndex::new();
//! let key = Fingerprint::Name("clip.mov".into());
//! index.insert(FileEntry::new(PathBuf::from("/a/clip.mov"), 10), key.clone());
//! index.insert(FileEntry::new(PathBuf::from("/b/clip.mov"), 10), key);
//! index.insert(
//!     FileEntry::new(PathBuf::from("/b/other.mov"), 5),
//!     Fingerprint::Name("other.mov".into()),
//! );
//!
//! let (groups, stats) = index.into_duplicate_groups();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].paths(), vec![PathBuf::from("/a/clip.mov"), PathBuf::from("/b/clip.mov")]);
//! assert_eq!(stats.eliminated_unique, 1);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::scanner::{FileEntry, Fingerprint, FingerprintOutcome, HashError};

/// Files sharing one fingerprint, at least two of them once reported.
///
/// `files` keeps insertion order. The first entry is the keeper by
/// convention when no other signal applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// The shared fingerprint
    pub fingerprint: Fingerprint,
    /// Members in discovery order
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(fingerprint: Fingerprint, files: Vec<FileEntry>) -> Self {
        Self { fingerprint, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The first-discovered member.
    #[must_use]
    pub fn keeper(&self) -> Option<&Path> {
        self.files.first().map(|f| f.path.as_path())
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Space held by every member except the keeper.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        match self.files.first() {
            Some(first) if self.files.len() > 1 => self.total_size().saturating_sub(first.size),
            _ => 0,
        }
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Statistics from the grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Number of fingerprinted files inserted
    pub total_files: usize,
    /// Number of distinct fingerprints
    pub unique_fingerprints: usize,
    /// Number of files in singleton buckets (not duplicates)
    pub eliminated_unique: usize,
    /// Number of buckets with 2+ files
    pub duplicate_groups: usize,
    /// Number of files in buckets with 2+ files
    pub grouped_files: usize,
}

impl GroupingStats {
    /// Percentage of files that turned out to be unique.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Mapping from fingerprint to the files that share it.
///
/// Single writer: inserts take `&mut self`. Parallel producers collect
/// their results first and insert from one thread.
#[derive(Debug, Default)]
pub struct GroupingIndex {
    slots: HashMap<Fingerprint, usize>,
    buckets: Vec<(Fingerprint, Vec<FileEntry>)>,
    total_files: usize,
}

impl GroupingIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a stream of files and a fingerprint function.
    ///
    /// Files whose fingerprint is skipped are left out and their reasons
    /// returned alongside the index.
    pub fn build<I, F>(files: I, mut fingerprint: F) -> (Self, Vec<HashError>)
    where
        I: IntoIterator<Item = FileEntry>,
        F: FnMut(&FileEntry) -> FingerprintOutcome,
    {
        Self::from_outcomes(files.into_iter().map(|file| {
            let outcome = fingerprint(&file);
            (file, outcome)
        }))
    }

    /// Build an index from files whose fingerprints were computed elsewhere.
    pub fn from_outcomes<I>(outcomes: I) -> (Self, Vec<HashError>)
    where
        I: IntoIterator<Item = (FileEntry, FingerprintOutcome)>,
    {
        let mut index = Self::new();
        let mut skipped = Vec::new();
        for (file, outcome) in outcomes {
            match outcome {
                FingerprintOutcome::Ready(fp) => index.insert(file, fp),
                FingerprintOutcome::Skipped(reason) => {
                    log::warn!("Skipping unreadable file: {}", reason);
                    skipped.push(reason);
                }
            }
        }
        (index, skipped)
    }

    /// Append a file to the bucket for `fingerprint`.
    pub fn insert(&mut self, file: FileEntry, fingerprint: Fingerprint) {
        self.total_files += 1;
        match self.slots.get(&fingerprint) {
            Some(&slot) => self.buckets[slot].1.push(file),
            None => {
                self.slots.insert(fingerprint.clone(), self.buckets.len());
                self.buckets.push((fingerprint, vec![file]));
            }
        }
    }

    /// Files recorded for `fingerprint`, in insertion order.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&[FileEntry]> {
        self.slots
            .get(fingerprint)
            .map(|&slot| self.buckets[slot].1.as_slice())
    }

    /// Number of distinct fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether nothing has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of files inserted.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.total_files
    }

    /// Iterate all buckets, singletons included, in first-seen order.
    pub fn buckets(&self) -> impl Iterator<Item = (&Fingerprint, &[FileEntry])> {
        self.buckets.iter().map(|(fp, files)| (fp, files.as_slice()))
    }

    /// Consume the index, keeping only buckets with two or more files.
    #[must_use]
    pub fn into_duplicate_groups(self) -> (Vec<DuplicateGroup>, GroupingStats) {
        let mut stats = GroupingStats {
            total_files: self.total_files,
            unique_fingerprints: self.buckets.len(),
            ..Default::default()
        };

        let groups: Vec<DuplicateGroup> = self
            .buckets
            .into_iter()
            .filter_map(|(fingerprint, files)| {
                if files.len() < 2 {
                    stats.eliminated_unique += files.len();
                    return None;
                }
                stats.duplicate_groups += 1;
                stats.grouped_files += files.len();
                log::debug!("Duplicate group {}: {} files", fingerprint, files.len());
                Some(DuplicateGroup::new(fingerprint, files))
            })
            .collect();

        (groups, stats)
    }
}
