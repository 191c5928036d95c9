use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::commit::Tree;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, Result};

impl Repository {
    /// Switch to `branch_name`: sync the working tree to its commit, bind
    /// HEAD to it and clear the staging area.
    pub fn checkout(&self, branch_name: &str) -> Result<ObjectId> {
        self.ensure_initialized()?;
        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| GitletError::NoSuchBranch(branch_name.to_string()))?;

        let target_oid = self.refs().read_branch(&branch_name)?;
        if self.refs().is_current_branch(&branch_name)? {
            return Err(GitletError::NoOpCheckoutOfActiveBranch);
        }

        let (_, head_commit) = self.head_commit()?;
        let target_commit = self.database().load_commit(&target_oid)?;

        self.migrate_working_tree(head_commit.tree(), target_commit.tree())?;
        self.refs().set_head_to_branch(&branch_name)?;

        tracing::info!(branch = %branch_name, commit = %target_oid.to_short_oid(), "switched branch");

        Ok(target_oid)
    }

    /// Overwrite the working copy of `file_path` with its version in
    /// `revision` (HEAD when `None`). The staging area is left alone.
    pub fn checkout_path(&self, revision: Option<&str>, file_path: &str) -> Result<()> {
        let file_path = &self.workspace().normalize_path(file_path)?;
        let commit_oid = match revision {
            Some(revision) => Revision::try_parse(revision)?.resolve(self)?,
            None => self.head_oid()?,
        };
        let commit = self.database().load_commit(&commit_oid)?;

        let blob_id = commit
            .blob_for(file_path)
            .ok_or_else(|| GitletError::FileNotTrackedInCommit(file_path.to_string()))?;
        let data = self.database().load_blob_data(blob_id)?;

        self.workspace().write_file(file_path, &data)
    }

    /// Replace the working tree contents tracked by `current` with `target`.
    ///
    /// Fails before touching anything if an untracked file sits where
    /// `target` would write. The staging area ends up empty.
    pub(crate) fn migrate_working_tree(&self, current: &Tree, target: &Tree) -> Result<()> {
        let migration = Migration::new(current, target);
        migration.check_untracked(&self.workspace().list_files()?)?;

        let mut index = self.load_index()?;
        self.workspace().apply_migration(&migration, self.database())?;

        index.clear();
        index.write_updates()?;

        Ok(())
    }
}
