//! Duplicate detection module.
//!
//! This module provides:
//! - Fingerprint grouping in discovery order ([`GroupingIndex`])
//! - The removal policy for a target prefix ([`select_removals`])
//! - The end-to-end scan pipeline ([`DuplicateFinder`])

pub mod finder;
pub mod groups;
pub mod policy;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, RemovalScan, ScanSummary};
pub use groups::{DuplicateGroup, GroupingIndex, GroupingStats};
pub use policy::{plan_group, plan_removals, select_removals, RemovalPlan};
