//! Merge algorithms
//!
//! - `bca_finder`: split-point search over the commit DAG
//! - `resolve`: per-path three-way classification and conflict content
//!
//! A merge runs as PRECHECK, FIND_SPLIT, then either a fast-forward shortcut
//! or a three-way merge, and finally creates the merge commit. The outcome is
//! reported as a [`MergeOutcome`]; only precondition failures are errors.

use crate::artifacts::objects::object_id::ObjectId;

pub mod bca_finder;
pub mod resolve;

/// What a successful merge did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The target is already an ancestor of the current commit; nothing changed
    AlreadyUpToDate,
    /// The current commit was an ancestor of the target; the active branch now
    /// points at the target commit
    FastForwarded(ObjectId),
    /// A merge commit was created. `conflicted` holds the paths written with
    /// conflict markers.
    Merged {
        commit: ObjectId,
        conflicted: Vec<String>,
    },
}

impl MergeOutcome {
    pub fn has_conflicts(&self) -> bool {
        matches!(self, MergeOutcome::Merged { conflicted, .. } if !conflicted.is_empty())
    }
}
