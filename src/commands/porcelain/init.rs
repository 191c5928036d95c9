use crate::areas::repository::Repository;
use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, Result};
use anyhow::Context;
use std::fs;

const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

impl Repository {
    /// Create the metadata directory and the initial commit, with HEAD bound
    /// to the default branch.
    pub fn init(&self) -> Result<ObjectId> {
        if self.is_initialized() {
            return Err(GitletError::AlreadyInitialized);
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .gitlet/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .gitlet/refs/heads directory")?;

        let initial_commit = Commit::initial(INITIAL_COMMIT_MESSAGE);
        let initial_oid = self.database().store(&initial_commit)?;

        let default_branch = BranchName::try_parse(DEFAULT_BRANCH.to_string())?;
        self.refs().update_branch(&default_branch, &initial_oid)?;
        self.refs().set_head_to_branch(&default_branch)?;

        let mut index = self.index();
        index.clear();
        index.write_updates()?;

        tracing::info!(
            path = %self.path().display(),
            commit = %initial_oid.to_short_oid(),
            "initialized repository"
        );

        Ok(initial_oid)
    }
}
