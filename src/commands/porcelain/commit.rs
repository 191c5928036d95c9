use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, Result};

impl Repository {
    pub fn commit(&self, message: &str) -> Result<ObjectId> {
        let message = message.trim();
        if message.is_empty() {
            return Err(GitletError::EmptyCommitMessage);
        }

        let head_oid = self.head_oid()?;
        if self.load_index()?.is_empty() {
            return Err(GitletError::NothingStaged);
        }

        let (commit_id, commit) = self.write_commit(vec![head_oid], message)?;

        tracing::info!(
            commit = %commit_id.to_short_oid(),
            message = commit.short_message(),
            "created commit"
        );

        Ok(commit_id)
    }
}
