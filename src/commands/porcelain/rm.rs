use crate::areas::repository::Repository;
use crate::errors::{GitletError, Result};

impl Repository {
    /// Unstage `file_path` and, when the current commit tracks it, stage its
    /// removal and delete the working copy.
    pub fn rm(&self, file_path: &str) -> Result<()> {
        let (_, head_commit) = self.head_commit()?;
        let file_path = &self.workspace().normalize_path(file_path)?;
        let mut index = self.load_index()?;

        let is_staged = index.staged_addition(file_path).is_some();
        let is_tracked = head_commit.tracks(file_path);
        if !is_staged && !is_tracked {
            return Err(GitletError::NothingToRemove(file_path.to_string()));
        }

        index.unstage_addition(file_path);
        if is_tracked {
            index.stage_removal(file_path);
            if self.workspace().file_exists(file_path) {
                self.workspace().remove_file(file_path)?;
            }
        }

        index.write_updates()?;

        Ok(())
    }
}
