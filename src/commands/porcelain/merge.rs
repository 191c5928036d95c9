use crate::areas::database::CommitCache;
use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::MergeOutcome;
use crate::artifacts::merge::bca_finder::BCAFinder;
use crate::artifacts::merge::resolve::{MergeAction, Resolve, conflict_content};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, Result};
use bytes::Bytes;

impl Repository {
    /// Merge `branch_name` into the active branch.
    ///
    /// Every precondition is checked before anything is written. Conflicts do
    /// not fail the merge: the conflicted files are written with markers,
    /// staged, and committed with the rest.
    pub fn merge(&self, branch_name: &str) -> Result<MergeOutcome> {
        let (head_oid, head_commit) = self.head_commit()?;

        if !self.load_index()?.is_empty() {
            return Err(GitletError::UncommittedChanges);
        }

        let target_branch = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| GitletError::NoSuchBranch(branch_name.to_string()))?;
        let target_oid = self.refs().read_branch(&target_branch)?;
        if self.refs().is_current_branch(&target_branch)? {
            return Err(GitletError::SelfMerge);
        }

        let target_commit = self.database().load_commit(&target_oid)?;
        Migration::new(head_commit.tree(), target_commit.tree())
            .check_untracked(&self.workspace().list_files()?)?;

        let split_oid = self.find_split_point(&head_oid, &target_oid)?;

        if split_oid == target_oid {
            tracing::info!(target: "gitlet::merge", branch = %target_branch, "already up to date");
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        if split_oid == head_oid {
            self.migrate_working_tree(head_commit.tree(), target_commit.tree())?;
            self.refs().update_head(&target_oid)?;

            tracing::info!(
                target: "gitlet::merge",
                branch = %target_branch,
                commit = %target_oid.to_short_oid(),
                "fast-forwarded"
            );
            return Ok(MergeOutcome::FastForwarded(target_oid));
        }

        let split_commit = self.database().load_commit(&split_oid)?;
        let plan = Resolve::new(
            split_commit.tree(),
            head_commit.tree(),
            target_commit.tree(),
        )
        .plan();

        let mut conflicted = Vec::new();
        {
            let mut index = self.load_index()?;

            for (path, action) in plan {
                match action {
                    MergeAction::Keep => {}
                    MergeAction::TakeTarget(blob_id) => {
                        let data = self.database().load_blob_data(&blob_id)?;
                        self.workspace().write_file(path, &data)?;
                        index.stage_addition(path, blob_id);
                    }
                    MergeAction::Remove => {
                        if self.workspace().file_exists(path) {
                            self.workspace().remove_file(path)?;
                        }
                        index.stage_removal(path);
                    }
                    MergeAction::Conflict { current, target } => {
                        let current_data = self.blob_data_or_empty(current.as_ref())?;
                        let target_data = self.blob_data_or_empty(target.as_ref())?;
                        let blob = Blob::new(conflict_content(&current_data, &target_data));

                        self.workspace().write_file(path, blob.content())?;
                        index.stage_addition(path, self.database().store(&blob)?);

                        tracing::warn!(target: "gitlet::merge", path = %path, "merge conflict");
                        conflicted.push(path.clone());
                    }
                }
            }

            index.write_updates()?;
        }

        let active_name = self
            .refs()
            .active_branch()?
            .map(|branch| branch.to_string())
            .unwrap_or_else(|| HEAD_REF_NAME.to_string());
        let message = format!("Merged {target_branch} into {active_name}.");
        let (commit_id, _) = self.write_commit(vec![head_oid, target_oid], &message)?;

        tracing::info!(
            target: "gitlet::merge",
            commit = %commit_id.to_short_oid(),
            conflicts = conflicted.len(),
            "created merge commit"
        );

        Ok(MergeOutcome::Merged {
            commit: commit_id,
            conflicted,
        })
    }

    /// Best common ancestor of two commits over every parent edge.
    pub fn find_split_point(&self, current: &ObjectId, target: &ObjectId) -> Result<ObjectId> {
        let commit_cache = CommitCache::new();
        let database = self.database();

        BCAFinder::new(|oid: &ObjectId| commit_cache.get_or_load_slim_commit(database, oid))
            .find_best_common_ancestor(current, target)?
            .ok_or_else(|| GitletError::NoCommonAncestor(current.clone(), target.clone()))
    }

    fn blob_data_or_empty(&self, blob_id: Option<&ObjectId>) -> Result<Bytes> {
        match blob_id {
            Some(blob_id) => self.database().load_blob_data(blob_id),
            None => Ok(Bytes::new()),
        }
    }
}
