//! Error types for repository operations
//!
//! Every precondition failure is reported through [`GitletError`] before the
//! operation mutates refs, the staging area or the working tree. Storage-level
//! failures (unreadable object files, corrupted staging file, ...) are carried
//! as `anyhow` errors with context attached at the failing call site.

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;
use thiserror::Error;

/// All failures a repository operation can report to its caller.
#[derive(Error, Debug)]
pub enum GitletError {
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,

    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("File does not exist: {0}")]
    FileNotFound(String),

    /// A path outside the working tree, inside the metadata directory, or one
    /// a commit tree cannot record.
    #[error("Not a trackable path in the working tree: {0:?}")]
    InvalidPath(String),

    #[error("Object {0} does not exist.")]
    ObjectNotFound(ObjectId),

    #[error("No commit with that id exists: {0}")]
    NoSuchCommit(String),

    /// An abbreviated id matched several commits.
    #[error("short commit id {prefix} is ambiguous ({} candidates)", .candidates.len())]
    AmbiguousCommitId {
        prefix: String,
        candidates: Vec<ObjectId>,
    },

    #[error("A branch with that name does not exist: {0}")]
    NoSuchBranch(String),

    #[error("A branch with that name already exists: {0}")]
    BranchAlreadyExists(String),

    #[error("'{0}' is not a valid branch name")]
    InvalidBranchName(String),

    #[error("Cannot remove the current branch.")]
    CannotRemoveActiveBranch,

    #[error("No reason to remove the file: {0}")]
    NothingToRemove(String),

    #[error("Please enter a commit message.")]
    EmptyCommitMessage,

    #[error("No changes added to the commit.")]
    NothingStaged,

    #[error("File does not exist in that commit: {0}")]
    FileNotTrackedInCommit(String),

    /// Untracked working files that the operation would overwrite.
    #[error(
        "There is an untracked file in the way; delete it, or add and commit it first: {}",
        display_paths(.0)
    )]
    UntrackedFileWouldBeOverwritten(Vec<PathBuf>),

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    SelfMerge,

    #[error("No need to checkout the current branch.")]
    NoOpCheckoutOfActiveBranch,

    #[error("No common ancestor between {0} and {1}")]
    NoCommonAncestor(ObjectId, ObjectId),

    #[error("Invalid revision: {0}")]
    InvalidRevision(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, GitletError>;
