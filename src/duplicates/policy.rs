//! Removal selection for duplicate groups.
//!
//! Given one removal-eligible prefix, every group is split into members
//! under the prefix and members outside it:
//!
//! - If any member lies outside the prefix, all members under the prefix
//!   are removed. The outside copies are authoritative.
//! - If every member lies under the prefix, all but the first are removed.
//!
//! A member outside the prefix is never selected, and every group of two
//! or more keeps at least one file. Nothing here touches the filesystem.
//!
//! # Example
//!
//! ```
//! use mediadupe::duplicates::{select_removals, DuplicateGroup};
//! use mediadupe::scanner::{FileEntry, Fingerprint};
//! use std::path::{Path, PathBuf};
//!
//! let group = DuplicateGroup::new(
//!     Fingerprint::Name("x.txt".into()),
//!     vec![
//!         FileEntry::new(PathBuf::from("/a/x.txt"), 10),
//!         FileEntry::new(PathBuf::from("/b/x.txt"), 10),
//!     ],
//! );
//!
//! let removals = select_removals(&[group], Path::new("/b"));
//! assert_eq!(removals, vec![PathBuf::from("/b/x.txt")]);
//! ```

use std::path::{Path, PathBuf};

use super::DuplicateGroup;
use crate::scanner::path_utils::has_prefix;

/// Keep/remove split for one duplicate group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalPlan {
    /// Members that survive, in group order
    pub keep: Vec<PathBuf>,
    /// Members selected for removal, in group order
    pub remove: Vec<PathBuf>,
}

impl RemovalPlan {
    /// Whether this plan removes anything.
    #[must_use]
    pub fn has_removals(&self) -> bool {
        !self.remove.is_empty()
    }
}

/// Decide which members of one group to remove.
///
/// Groups with fewer than two members are not duplicates and keep everything.
#[must_use]
pub fn plan_group(group: &DuplicateGroup, removal_prefix: &Path) -> RemovalPlan {
    let mut plan = RemovalPlan::default();

    if group.len() < 2 {
        plan.keep = group.paths();
        return plan;
    }

    let (matching, non_matching): (Vec<PathBuf>, Vec<PathBuf>) = group
        .paths()
        .into_iter()
        .partition(|p| has_prefix(p, removal_prefix));

    if non_matching.is_empty() {
        // Everything is removal-eligible: keep the first-discovered copy
        let mut matching = matching.into_iter();
        plan.keep.extend(matching.next());
        plan.remove.extend(matching);
    } else {
        plan.keep = non_matching;
        plan.remove = matching;
    }

    plan
}

/// Per-group plans, in group order.
#[must_use]
pub fn plan_removals(groups: &[DuplicateGroup], removal_prefix: &Path) -> Vec<RemovalPlan> {
    groups
        .iter()
        .map(|group| plan_group(group, removal_prefix))
        .collect()
}

/// Flat removal list: group order, then member order within each group.
#[must_use]
pub fn select_removals(groups: &[DuplicateGroup], removal_prefix: &Path) -> Vec<PathBuf> {
    let removals: Vec<PathBuf> = plan_removals(groups, removal_prefix)
        .into_iter()
        .flat_map(|plan| plan.remove)
        .collect();

    log::debug!(
        "Selected {} file(s) for removal under {}",
        removals.len(),
        removal_prefix.display()
    );

    removals
}
