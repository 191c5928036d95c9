use crate::areas::database::Database;
use crate::areas::repository::METADATA_DIR;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::blob::Blob;
use crate::errors::{GitletError, Result};
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [METADATA_DIR, ".", ".."];

/// The working tree
///
/// Paths handed to and returned from the workspace are repository-relative
/// and `/`-separated, the same keys a commit tree uses.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every regular file in the working tree, sorted, metadata excluded.
    pub fn list_files(&self) -> Result<Vec<String>> {
        let mut files = WalkDir::new(&self.path)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path().strip_prefix(&self.path).ok()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.relative_key(entry.path()))
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(relative_path: Option<&Path>) -> bool {
        relative_path.is_some_and(|path| {
            path.components().any(|component| {
                if let Component::Normal(name) = component {
                    IGNORED_PATHS.contains(&name.to_string_lossy().as_ref())
                } else {
                    false
                }
            })
        })
    }

    fn relative_key(&self, path: &Path) -> Option<String> {
        let relative_path = path.strip_prefix(self.path.as_ref()).ok()?;

        Some(
            relative_path
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
        )
    }

    /// Repository-relative, `/`-separated key for a user-supplied path.
    ///
    /// Absolute paths must lie inside the working tree. Paths climbing out
    /// with `..`, paths into the metadata directory and names holding line
    /// breaks are rejected with `InvalidPath`.
    pub fn normalize_path(&self, file_path: &str) -> Result<String> {
        let invalid = || GitletError::InvalidPath(file_path.to_string());

        let path = Path::new(file_path);
        let relative_path = if path.is_absolute() {
            path.strip_prefix(self.path.as_ref()).map_err(|_| invalid())?
        } else {
            path
        };

        let mut names = Vec::new();
        for component in relative_path.components() {
            match component {
                Component::CurDir => {}
                Component::Normal(name) => names.push(name.to_str().ok_or_else(invalid)?),
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid());
                }
            }
        }

        if names.is_empty()
            || names
                .iter()
                .any(|name| *name == METADATA_DIR || name.contains(['\n', '\r']))
        {
            return Err(invalid());
        }

        Ok(names.join("/"))
    }

    fn absolute_path(&self, file_path: &str) -> PathBuf {
        self.path.join(file_path)
    }

    pub fn file_exists(&self, file_path: &str) -> bool {
        self.absolute_path(file_path).is_file()
    }

    pub fn read_file(&self, file_path: &str) -> Result<Bytes> {
        let path = self.absolute_path(file_path);

        if !path.is_file() {
            return Err(GitletError::FileNotFound(file_path.to_string()));
        }

        let content = std::fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(content.into())
    }

    pub fn parse_blob(&self, file_path: &str) -> Result<Blob> {
        Ok(Blob::new(self.read_file(file_path)?))
    }

    /// Overwrite (or create) a working file, creating parent directories.
    pub fn write_file(&self, file_path: &str, data: &[u8]) -> Result<()> {
        let path = self.absolute_path(file_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for: {:?}", file_path))?;
        }
        // Only an emptied directory may give way to a file.
        if path.is_dir() {
            std::fs::remove_dir(&path).with_context(|| {
                format!("Failed to replace directory with a file: {:?}", file_path)
            })?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete a working file if present, then prune directories it leaves empty.
    pub fn remove_file(&self, file_path: &str) -> Result<()> {
        let path = self.absolute_path(file_path);

        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
            self.prune_empty_parent_dirs(&path)?;
        }

        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.starts_with(self.path.as_ref())
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    // Deletions go first so a file can replace a directory that only held
    // deleted files.
    pub fn apply_migration(&self, migration: &Migration, database: &Database) -> Result<()> {
        for file_path in migration.deletions() {
            self.remove_file(file_path)?;
        }

        for (file_path, oid) in migration.writes() {
            let data = database.load_blob_data(oid)?;
            self.write_file(file_path, &data)?;
        }

        Ok(())
    }
}
