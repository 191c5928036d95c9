//! References (branches and HEAD)
//!
//! References are human-readable names pointing to commits:
//! - Branches: `refs/heads/<name>` files holding a 40-character commit id
//! - HEAD: either `ref: refs/heads/<name>` (bound to the active branch) or a
//!   raw commit id (detached)
//!
//! Ref files are only ever rewritten after the objects they point at have
//! been stored, so a ref never names a missing commit.

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, Result};
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// References manager
///
/// Reads and writes HEAD and branch files under the metadata directory.
/// Writes take an exclusive lock on the ref file.
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.gitlet`)
    path: Box<Path>,
}

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Internal representation of a reference value
#[derive(Debug, Clone)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef { sym_ref_name: SymRefName },
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                sym_ref_name: SymRefName::new(symref_match[1].to_string()),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

impl Refs {
    /// Follow symbolic references from HEAD to the final direct reference.
    ///
    /// Returns `refs/heads/<name>` when HEAD is bound to a branch, `HEAD`
    /// itself when it is detached.
    pub fn current_ref(&self) -> Result<SymRefName> {
        self.resolve_sym_ref(SymRefName::new(HEAD_REF_NAME.to_string()))
    }

    fn resolve_sym_ref(&self, source: SymRefName) -> Result<SymRefName> {
        let ref_content =
            SymRefOrOid::read_symref_or_oid(self.path.join(source.as_ref_path()).as_path())?;

        match ref_content {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => self.resolve_sym_ref(sym_ref_name),
            Some(SymRefOrOid::Oid(_)) | None => Ok(source),
        }
    }

    /// The active branch, or `None` when HEAD is detached.
    pub fn active_branch(&self) -> Result<Option<BranchName>> {
        Ok(BranchName::from_sym_ref_name(&self.current_ref()?))
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> Result<bool> {
        Ok(self.active_branch()?.as_ref() == Some(branch_name))
    }

    /// Commit HEAD resolves to, following symbolic references.
    pub fn read_head(&self) -> Result<Option<ObjectId>> {
        Ok(self.read_symref(&self.head_path())?)
    }

    fn read_symref(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        let ref_content = SymRefOrOid::read_symref_or_oid(path)?;

        match ref_content {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                self.read_symref(self.path.join(sym_ref_name.as_ref_path()).as_path())
            }
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    /// Move whatever HEAD designates to `oid`: the active branch when HEAD is
    /// bound to one, HEAD itself when detached.
    pub fn update_head(&self, oid: &ObjectId) -> Result<()> {
        let target = self.current_ref()?;
        self.update_ref_file(
            self.path.join(target.as_ref_path()).into_boxed_path(),
            oid.as_ref(),
        )
    }

    /// Bind HEAD to `branch_name`.
    pub fn set_head_to_branch(&self, branch_name: &BranchName) -> Result<()> {
        self.update_ref_file(
            self.head_path(),
            &format!("ref: {}", SymRefName::for_branch(branch_name).as_ref_path()),
        )
    }

    fn update_ref_file(&self, path: Box<Path>, raw_ref: &str) -> Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.branch_path(branch_name).is_file()
    }

    /// Commit a branch points at; `NoSuchBranch` if it does not exist.
    pub fn read_branch(&self, branch_name: &BranchName) -> Result<ObjectId> {
        if !self.branch_exists(branch_name) {
            return Err(GitletError::NoSuchBranch(branch_name.to_string()));
        }

        self.read_symref(&self.branch_path(branch_name))?
            .ok_or_else(|| GitletError::NoSuchBranch(branch_name.to_string()))
    }

    pub fn create_branch(&self, branch_name: &BranchName, source_oid: &ObjectId) -> Result<()> {
        if self.branch_exists(branch_name) {
            return Err(GitletError::BranchAlreadyExists(branch_name.to_string()));
        }

        self.update_branch(branch_name, source_oid)
    }

    pub fn update_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> Result<()> {
        self.update_ref_file(self.branch_path(branch_name), oid.as_ref())
    }

    pub fn delete_branch(&self, branch_name: &BranchName) -> Result<ObjectId> {
        let oid = self.read_branch(branch_name)?;
        let branch_path = self.branch_path(branch_name);

        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;

        Ok(oid)
    }

    /// All branch names, sorted.
    pub fn list_branches(&self) -> Result<Vec<BranchName>> {
        let heads_path = self.heads_path();
        if !heads_path.exists() {
            return Ok(Vec::new());
        }

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                BranchName::try_parse(name).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn branch_path(&self, branch_name: &BranchName) -> Box<Path> {
        self.path
            .join(SymRefName::for_branch(branch_name).as_ref_path())
            .into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
