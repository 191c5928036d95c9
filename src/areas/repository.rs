use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, Result};
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Name of the metadata directory at the root of the working tree
pub const METADATA_DIR: &str = ".gitlet";

/// One repository: object store, refs, staging area and working tree.
///
/// Built once per operation and passed by reference; nothing about the
/// repository lives in process-wide state.
pub struct Repository {
    path: Box<Path>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        // A missing working tree is only created by `init`
        let path = if path.exists() {
            path.canonicalize()
        } else {
            std::path::absolute(path)
        }
        .with_context(|| format!("failed to resolve working tree at {path:?}"))?;
        let metadata_path = path.join(METADATA_DIR);

        let index = Index::new(metadata_path.join("index").into_boxed_path());
        let database = Database::new(metadata_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn index(&self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn is_initialized(&self) -> bool {
        self.refs.head_path().exists() && self.database.objects_path().is_dir()
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(GitletError::NotInitialized)
        }
    }

    /// Commit id HEAD resolves to.
    pub fn head_oid(&self) -> Result<ObjectId> {
        self.ensure_initialized()?;

        self.refs
            .read_head()?
            .ok_or_else(|| GitletError::NoSuchCommit("HEAD".to_string()))
    }

    pub fn head_commit(&self) -> Result<(ObjectId, Commit)> {
        let head_oid = self.head_oid()?;
        let head_commit = self.database.load_commit(&head_oid)?;

        Ok((head_oid, head_commit))
    }

    /// Staging area as last persisted.
    pub fn load_index(&self) -> Result<RefMut<'_, Index>> {
        let mut index = self.index();
        index.rehydrate()?;

        Ok(index)
    }
}
