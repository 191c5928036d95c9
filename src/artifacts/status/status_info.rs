use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Tree;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::errors::Result;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

pub type ChangeSet = BTreeMap<String, WorkspaceChangeType>;
pub type FileSet = BTreeSet<String>;

/// Snapshot of the repository as `status` reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    /// `None` when HEAD is detached
    pub active_branch: Option<BranchName>,
    pub branches: Vec<BranchName>,
    pub staged_files: FileSet,
    pub removed_files: FileSet,
    pub unstaged_changes: ChangeSet,
    pub untracked_files: FileSet,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self, index: &Index) -> Result<StatusInfo> {
        let (_, head_commit) = self.repository.head_commit()?;
        let workspace_files = self.hash_workspace()?;

        Ok(StatusInfo {
            active_branch: self.repository.refs().active_branch()?,
            branches: self.repository.refs().list_branches()?,
            staged_files: index.additions().keys().cloned().collect(),
            removed_files: index.removals().clone(),
            unstaged_changes: Self::unstaged_changes(head_commit.tree(), index, &workspace_files),
            untracked_files: Self::untracked_files(head_commit.tree(), index, &workspace_files),
        })
    }

    fn hash_workspace(&self) -> Result<BTreeMap<String, ObjectId>> {
        let workspace = self.repository.workspace();

        workspace
            .list_files()?
            .into_iter()
            .map(|path| -> Result<(String, ObjectId)> {
                let oid = workspace.parse_blob(&path)?.object_id()?;
                Ok((path, oid))
            })
            .collect()
    }

    // A staged file is compared against its staged content, anything else
    // against the current commit. Staged removals are never reported.
    fn unstaged_changes(
        head_tree: &Tree,
        index: &Index,
        workspace_files: &BTreeMap<String, ObjectId>,
    ) -> ChangeSet {
        let expected = head_tree
            .iter()
            .filter(|(path, _)| !index.is_staged_for_removal(path))
            .chain(index.additions().iter())
            .collect::<BTreeMap<_, _>>();

        expected
            .into_iter()
            .filter_map(|(path, oid)| match workspace_files.get(path) {
                None => Some((path.clone(), WorkspaceChangeType::Deleted)),
                Some(workspace_oid) if workspace_oid != oid => {
                    Some((path.clone(), WorkspaceChangeType::Modified))
                }
                Some(_) => None,
            })
            .collect()
    }

    // Files neither tracked nor staged, plus files staged for removal that
    // reappeared in the working tree.
    fn untracked_files(
        head_tree: &Tree,
        index: &Index,
        workspace_files: &BTreeMap<String, ObjectId>,
    ) -> FileSet {
        workspace_files
            .keys()
            .filter(|path| {
                index.staged_addition(path).is_none()
                    && (!head_tree.contains_key(*path) || index.is_staged_for_removal(path))
            })
            .cloned()
            .collect()
    }
}
