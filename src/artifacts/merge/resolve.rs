//! Per-path three-way classification
//!
//! Each path in the union of the split (S), current (C) and target (T) trees
//! is compared by blob id, absence included:
//!
//! | comparison      | action                                     |
//! |-----------------|--------------------------------------------|
//! | C == T          | keep (same change on both sides, or none)  |
//! | S == C          | take T: write and stage it, or remove it   |
//! | S == T          | keep C                                     |
//! | otherwise       | conflict                                   |

use crate::artifacts::objects::commit::Tree;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

pub const CONFLICT_OURS_MARKER: &str = "<<<<<<< HEAD";
pub const CONFLICT_SEPARATOR: &str = "=======";
pub const CONFLICT_THEIRS_MARKER: &str = ">>>>>>>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    /// The working file already holds the merged result
    Keep,
    /// Check out the target's version and stage it
    TakeTarget(ObjectId),
    /// The target deleted an unchanged file; remove and untrack it
    Remove,
    /// Both sides changed the file differently
    Conflict {
        current: Option<ObjectId>,
        target: Option<ObjectId>,
    },
}

impl MergeAction {
    pub fn classify(
        split: Option<&ObjectId>,
        current: Option<&ObjectId>,
        target: Option<&ObjectId>,
    ) -> Self {
        if current == target || split == target {
            MergeAction::Keep
        } else if split == current {
            match target {
                Some(target) => MergeAction::TakeTarget(target.clone()),
                None => MergeAction::Remove,
            }
        } else {
            MergeAction::Conflict {
                current: current.cloned(),
                target: target.cloned(),
            }
        }
    }
}

/// Three trees of a merge
#[derive(Debug, Clone)]
pub struct Resolve<'t> {
    split: &'t Tree,
    current: &'t Tree,
    target: &'t Tree,
}

impl<'t> Resolve<'t> {
    pub fn new(split: &'t Tree, current: &'t Tree, target: &'t Tree) -> Self {
        Resolve {
            split,
            current,
            target,
        }
    }

    /// Every path needing work, sorted. Paths classified as `Keep` are left
    /// out.
    pub fn plan(&self) -> BTreeMap<&'t String, MergeAction> {
        let paths = self
            .split
            .keys()
            .chain(self.current.keys())
            .chain(self.target.keys())
            .collect::<BTreeSet<_>>();

        paths
            .into_iter()
            .filter_map(|path| {
                let action = MergeAction::classify(
                    self.split.get(path),
                    self.current.get(path),
                    self.target.get(path),
                );

                tracing::debug!(target: "gitlet::merge", path = %path, action = ?action, "classified path");

                (action != MergeAction::Keep).then_some((path, action))
            })
            .collect()
    }
}

/// Working-file content recording both sides of a conflict.
///
/// A side that does not end in a newline gets one, so the markers always sit
/// on their own lines. A missing side contributes nothing.
pub fn conflict_content(current: &[u8], target: &[u8]) -> Bytes {
    let mut content = Vec::with_capacity(current.len() + target.len() + 32);

    content.extend_from_slice(CONFLICT_OURS_MARKER.as_bytes());
    content.push(b'\n');
    push_side(&mut content, current);
    content.extend_from_slice(CONFLICT_SEPARATOR.as_bytes());
    content.push(b'\n');
    push_side(&mut content, target);
    content.extend_from_slice(CONFLICT_THEIRS_MARKER.as_bytes());
    content.push(b'\n');

    Bytes::from(content)
}

fn push_side(content: &mut Vec<u8>, side: &[u8]) {
    content.extend_from_slice(side);
    if !side.is_empty() && !side.ends_with(b"\n") {
        content.push(b'\n');
    }
}
