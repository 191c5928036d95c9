//! Checkout migration and untracked-file detection
//!
//! Moving the working tree from one commit to another involves:
//!
//! 1. Comparing the current and target trees
//! 2. Refusing to clobber files the current commit does not track
//! 3. Planning the file system operations (delete, write)
//! 4. Applying them to the workspace
//!
//! ## Safety
//!
//! All operations are planned and checked before execution, so an untracked
//! file in the way is reported before anything on disk changes.

use crate::artifacts::objects::commit::Tree;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Planned migration from the current tree to a target tree
#[derive(Debug, Clone)]
pub struct Migration<'t> {
    current: &'t Tree,
    target: &'t Tree,
}

impl<'t> Migration<'t> {
    pub fn new(current: &'t Tree, target: &'t Tree) -> Self {
        Migration { current, target }
    }

    /// Paths tracked by the current tree only, sorted.
    pub fn deletions(&self) -> impl Iterator<Item = &'t String> + '_ {
        let target = self.target;

        self.current
            .keys()
            .filter(move |path| !target.contains_key(*path))
    }

    /// Every file of the target tree, written out in full.
    pub fn writes(&self) -> &'t BTreeMap<String, ObjectId> {
        self.target
    }

    /// Fail with `UntrackedFileWouldBeOverwritten` if a working file unknown
    /// to the current tree is in the way of the target tree: at a path it
    /// writes, below a path it writes as a file, or at a path it needs as a
    /// directory.
    pub fn check_untracked<'w>(
        &self,
        workspace_files: impl IntoIterator<Item = &'w String>,
    ) -> Result<()> {
        let in_the_way = workspace_files
            .into_iter()
            .filter(|path| !self.current.contains_key(*path))
            .filter(|path| {
                self.target.contains_key(*path)
                    || self.target_tracks_above(path)
                    || self.target_tracks_below(path)
            })
            .map(PathBuf::from)
            .collect::<Vec<_>>();

        if in_the_way.is_empty() {
            Ok(())
        } else {
            Err(GitletError::UntrackedFileWouldBeOverwritten(in_the_way))
        }
    }

    // Some ancestor directory of `path` is a file in the target tree.
    fn target_tracks_above(&self, path: &str) -> bool {
        path.match_indices('/')
            .any(|(slash, _)| self.target.contains_key(&path[..slash]))
    }

    fn target_tracks_below(&self, path: &str) -> bool {
        let prefix = format!("{path}/");

        self.target
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(tracked, _)| tracked.starts_with(&prefix))
    }
}
