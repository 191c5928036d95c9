//! Best common ancestor (split point) finder
//!
//! The split point of two commits is the commit a three-way merge compares
//! both sides against.
//!
//! ## Algorithm Overview
//!
//! ### Phase 1: Paint Both Histories
//!
//! A work-list traversal walks every parent edge (not only first parents)
//! starting from both commits at once. Each commit accumulates the sides it
//! was reached from; a commit is re-queued only when it gains a new side, so
//! the walk terminates on any DAG and never recurses.
//!
//! Commits painted from both sides form the common-ancestor set. A commit
//! counts as its own ancestor, so if one input reaches the other, the other
//! is in the set.
//!
//! ### Phase 2: Keep the Maximal Elements
//!
//! > A best common ancestor of X and Y is a common ancestor of X and Y that
//! > is not an ancestor of any other common ancestor.
//!
//! Every commit on a path between two common ancestors is itself a common
//! ancestor, so a common ancestor is redundant exactly when one of its
//! children is common too. Dropping all parents of common ancestors leaves
//! the maximal elements.
//!
//! ### Tie-break
//!
//! Criss-cross histories can leave several maximal elements. The smallest
//! object id wins, which makes the choice reproducible across runs and
//! machines.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let finder = BCAFinder::new(|commit_id| commit_cache.get_or_load_slim_commit(database, commit_id));
//!
//! let split_point = finder.find_best_common_ancestor(&head_oid, &merge_oid)?;
//! ```
//!
//! The search logs at `debug` level under the `gitlet::merge` target.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use bitflags::bitflags;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_SOURCE = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_SOURCE) {
            flags.push("SOURCE");
        }
        if self.contains(VisitState::VISITED_FROM_TARGET) {
            flags.push("TARGET");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Finds common ancestors between commits
///
/// Generic over the commit loader so the same search runs against the object
/// store or an in-memory graph.
///
/// # Type Parameters
///
/// * `CommitLoaderFn` - Loads the parents of a commit. Root
///   commits have an empty parents vector.
#[derive(Debug, Clone)]
pub struct BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Transitive closure over every parent edge, `commit_id` included.
    pub fn ancestors_of(&self, commit_id: &ObjectId) -> Result<HashSet<ObjectId>> {
        Ok(self
            .paint(commit_id, commit_id)?
            .into_keys()
            .collect::<HashSet<_>>())
    }

    /// Every commit reachable from both `source_commit_id` and
    /// `target_commit_id` (each counting as reachable from itself).
    pub fn find_common_ancestors(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> Result<HashSet<ObjectId>> {
        Ok(self
            .paint(source_commit_id, target_commit_id)?
            .into_iter()
            .filter(|(_, state)| state.contains(VisitState::VISITED_FROM_BOTH))
            .map(|(oid, _)| oid)
            .collect())
    }

    fn paint(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> Result<HashMap<ObjectId, VisitState>> {
        let mut ancestors_states = HashMap::<ObjectId, VisitState>::new();
        let mut queue = VecDeque::new();

        ancestors_states.insert(source_commit_id.clone(), VisitState::VISITED_FROM_SOURCE);
        *ancestors_states
            .entry(target_commit_id.clone())
            .or_insert(VisitState::NONE) |= VisitState::VISITED_FROM_TARGET;

        queue.push_back(source_commit_id.clone());
        if target_commit_id != source_commit_id {
            queue.push_back(target_commit_id.clone());
        }

        while let Some(commit_id) = queue.pop_front() {
            let current_state = ancestors_states
                .get(&commit_id)
                .copied()
                .unwrap_or(VisitState::NONE);

            tracing::trace!(target: "gitlet::merge", commit = %commit_id, state = %current_state, "processing commit");

            let current_commit = (self.commit_loader)(&commit_id)?;

            for parent_id in current_commit.parents {
                let parent_state = ancestors_states
                    .get(&parent_id)
                    .copied()
                    .unwrap_or(VisitState::NONE);

                // Only revisit a parent when it gains a side it lacked
                if !parent_state.contains(current_state) {
                    ancestors_states.insert(parent_id.clone(), parent_state | current_state);
                    queue.push_back(parent_id);
                }
            }
        }

        Ok(ancestors_states)
    }

    /// Maximal elements of the common-ancestor set, sorted by object id.
    pub fn find_best_common_ancestors(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> Result<Vec<ObjectId>> {
        let common_ancestors = self.find_common_ancestors(source_commit_id, target_commit_id)?;

        tracing::debug!(
            target: "gitlet::merge",
            source = %source_commit_id,
            target = %target_commit_id,
            count = common_ancestors.len(),
            "found common ancestors"
        );

        let mut redundant_ancestors = HashSet::<ObjectId>::new();
        for commit_id in &common_ancestors {
            let commit = (self.commit_loader)(commit_id)?;

            redundant_ancestors.extend(
                commit
                    .parents
                    .into_iter()
                    .filter(|parent_id| common_ancestors.contains(parent_id)),
            );
        }

        let best_common_ancestors = common_ancestors
            .into_iter()
            .filter(|commit_id| !redundant_ancestors.contains(commit_id))
            .collect::<BTreeSet<_>>();

        tracing::debug!(
            target: "gitlet::merge",
            redundant = redundant_ancestors.len(),
            best = ?best_common_ancestors.iter().map(ObjectId::to_short_oid).collect::<Vec<_>>(),
            "filtered redundant ancestors"
        );

        Ok(best_common_ancestors.into_iter().collect())
    }

    /// The split point of two commits, `None` for unrelated histories.
    ///
    /// When several best common ancestors exist the smallest object id is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// // Linear history: A <- B <- C <- D
    /// let bca = finder.find_best_common_ancestor(&b, &d)?;
    /// assert_eq!(bca, Some(b)); // B is the best common ancestor
    ///
    /// // Criss-cross: D = merge(B, C), E = merge(C, B)
    /// let bca = finder.find_best_common_ancestor(&d, &e)?;
    /// assert_eq!(bca, Some(min(b, c)));
    /// ```
    pub fn find_best_common_ancestor(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> Result<Option<ObjectId>> {
        Ok(self
            .find_best_common_ancestors(source_commit_id, target_commit_id)?
            .into_iter()
            .next())
    }
}
