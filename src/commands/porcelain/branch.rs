use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, Result};

/// A branch and whether HEAD is bound to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchListing {
    pub name: BranchName,
    pub is_active: bool,
}

impl Repository {
    /// Create `branch_name` at the current HEAD commit.
    pub fn branch(&self, branch_name: &str) -> Result<ObjectId> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let head_oid = self.head_oid()?;

        self.refs().create_branch(&branch_name, &head_oid)?;

        tracing::info!(branch = %branch_name, commit = %head_oid.to_short_oid(), "created branch");

        Ok(head_oid)
    }

    /// Delete the ref `branch_name`. The commits it pointed at stay in the
    /// object store.
    pub fn remove_branch(&self, branch_name: &str) -> Result<ObjectId> {
        self.ensure_initialized()?;
        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| GitletError::NoSuchBranch(branch_name.to_string()))?;

        if self.refs().is_current_branch(&branch_name)? {
            return Err(GitletError::CannotRemoveActiveBranch);
        }

        let oid = self.refs().delete_branch(&branch_name)?;

        tracing::info!(branch = %branch_name, commit = %oid.to_short_oid(), "deleted branch");

        Ok(oid)
    }

    /// Every branch, sorted by name.
    pub fn branches(&self) -> Result<Vec<BranchListing>> {
        self.ensure_initialized()?;
        let active_branch = self.refs().active_branch()?;

        Ok(self
            .refs()
            .list_branches()?
            .into_iter()
            .map(|name| BranchListing {
                is_active: active_branch.as_ref() == Some(&name),
                name,
            })
            .collect())
    }
}
