//! Staging area
//!
//! The staging area buffers the changes that the next commit will apply to
//! the current commit's tree:
//!
//! - `additions`: path -> blob id of content staged for addition
//! - `removals`: paths staged for removal
//!
//! A path never sits in both sets at once. Both sets are drained by every
//! successful commit, checkout, reset and merge.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::staged_entry::{
    StagedAddition, read_removal, serialize_removal,
};
use crate::artifacts::index::HEADER_SIZE;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the staging file (typically `.gitlet/index`)
    path: Box<Path>,
    additions: BTreeMap<String, ObjectId>,
    removals: BTreeSet<String>,
    /// Flag indicating if the staging area has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn additions(&self) -> &BTreeMap<String, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeSet<String> {
        &self.removals
    }

    pub fn staged_addition(&self, path: &str) -> Option<&ObjectId> {
        self.additions.get(path)
    }

    pub fn is_staged_for_removal(&self, path: &str) -> bool {
        self.removals.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Stage `path` with the given content, replacing any earlier staged
    /// content and cancelling a staged removal of the same path.
    pub fn stage_addition(&mut self, path: &str, oid: ObjectId) {
        self.removals.remove(path);
        self.additions.insert(path.to_string(), oid);
        self.changed = true;
    }

    /// Stage `path` for removal, cancelling a staged addition of it.
    pub fn stage_removal(&mut self, path: &str) {
        self.additions.remove(path);
        self.removals.insert(path.to_string());
        self.changed = true;
    }

    /// Drop a staged addition. Returns whether one existed.
    pub fn unstage_addition(&mut self, path: &str) -> bool {
        let removed = self.additions.remove(path).is_some();
        self.changed |= removed;
        removed
    }

    /// Forget every staged change for `path`.
    pub fn discard(&mut self, path: &str) {
        let removed_addition = self.additions.remove(path).is_some();
        let removed_removal = self.removals.remove(path);
        self.changed |= removed_addition || removed_removal;
    }

    pub fn clear(&mut self) {
        self.changed |= !self.is_empty();
        self.additions.clear();
        self.removals.clear();
    }

    /// Load the staging area from disk
    ///
    /// Reads the staging file, parses the header and entries, and verifies
    /// the checksum. A missing or empty file is an empty staging area.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the staging file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(&self.path)
            .with_context(|| format!("failed to open staging file at {:?}", self.path))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        // an empty file is an empty staging area
        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock);
        let header = IndexHeader::deserialize(&reader.read(HEADER_SIZE)?)?;

        for _ in 0..header.additions_count {
            let addition = StagedAddition::read_from(&mut reader)?;
            self.additions.insert(addition.path, addition.oid);
        }
        for _ in 0..header.removals_count {
            self.removals.insert(read_removal(&mut reader)?);
        }

        reader.verify()
    }

    /// Persist the staging area
    ///
    /// # Locking
    ///
    /// Acquires an exclusive lock on the staging file while writing.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("failed to open staging file at {:?}", self.path))?;
        let lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = Checksum::new(lock);

        let header = IndexHeader::new(self.additions.len() as u32, self.removals.len() as u32);
        writer.write(&header.serialize()?)?;

        for (path, oid) in &self.additions {
            let entry = StagedAddition::new(path.clone(), oid.clone());
            writer.write(&entry.serialize()?)?;
        }
        for path in &self.removals {
            writer.write(&serialize_removal(path)?)?;
        }

        writer.write_checksum()?;
        self.changed = false;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    #[fixture]
    fn index_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn index(dir: &TempDir) -> Index {
        Index::new(dir.path().join("index").into_boxed_path())
    }

    #[rstest]
    fn missing_file_loads_as_empty(index_dir: TempDir) {
        let mut index = index(&index_dir);

        index.rehydrate().unwrap();

        assert!(index.is_empty());
    }

    #[rstest]
    fn staged_changes_survive_a_reload(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.stage_addition("a.txt", oid('a'));
        index.stage_addition("dir/b.txt", oid('b'));
        index.stage_removal("gone.txt");
        index.write_updates().unwrap();

        let mut reloaded = self::index(&index_dir);
        reloaded.rehydrate().unwrap();

        assert_eq!(reloaded.additions(), index.additions());
        assert_eq!(reloaded.removals(), index.removals());
        assert!(!reloaded.has_changed());
    }

    #[rstest]
    fn addition_and_removal_are_mutually_exclusive(index_dir: TempDir) {
        let mut index = index(&index_dir);

        index.stage_addition("a.txt", oid('a'));
        index.stage_removal("a.txt");
        assert_eq!(index.staged_addition("a.txt"), None);
        assert!(index.is_staged_for_removal("a.txt"));

        index.stage_addition("a.txt", oid('b'));
        assert_eq!(index.staged_addition("a.txt"), Some(&oid('b')));
        assert!(!index.is_staged_for_removal("a.txt"));
    }

    #[rstest]
    fn corrupted_file_fails_checksum(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.stage_addition("a.txt", oid('a'));
        index.write_updates().unwrap();

        let mut bytes = std::fs::read(index.path()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        std::fs::write(index.path(), bytes).unwrap();

        assert!(index.rehydrate().is_err());
    }
}
