use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::errors::Result;

/// What `add` did to the staging area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// New content staged for addition
    Staged,
    /// The file matches the current commit; any staged change was dropped
    Unchanged,
}

impl Repository {
    /// Stage the working copy of `file_path`.
    ///
    /// Content identical to the current commit's version cancels whatever
    /// was staged for the path instead of staging it again.
    pub fn add(&self, file_path: &str) -> Result<AddOutcome> {
        let (_, head_commit) = self.head_commit()?;
        let file_path = &self.workspace().normalize_path(file_path)?;
        let blob = self.workspace().parse_blob(file_path)?;
        let blob_id = blob.object_id()?;

        let mut index = self.load_index()?;

        let outcome = if head_commit.blob_for(file_path) == Some(&blob_id) {
            index.discard(file_path);
            AddOutcome::Unchanged
        } else {
            self.database().store(&blob)?;
            index.stage_addition(file_path, blob_id);
            AddOutcome::Staged
        };

        if index.has_changed() {
            index.write_updates()?;
        }

        Ok(outcome)
    }
}
