//! Commit object
//!
//! Commits are immutable snapshots of the whole set of tracked files. The
//! tree is embedded in the commit: every tracked path maps straight to a
//! blob id, so there are no separate tree objects.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! timestamp <unix-seconds> <timezone>
//! parent <parent-sha>          (zero, one or two lines, in order)
//! file <blob-sha> <path>       (one line per tracked path, sorted by path)
//!
//! <commit message>
//! ```
//!
//! The serialization is canonical: two commits with the same message,
//! timestamp, parents and tree always hash identically.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use std::io::BufRead;

/// Environment variable overriding the wall clock for new commits
pub const COMMIT_DATE_ENV: &str = "GITLET_COMMIT_DATE";

/// Path -> blob id mapping of every file tracked by a commit
pub type Tree = BTreeMap<String, ObjectId>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    message: String,
    timestamp: DateTime<FixedOffset>,
    parents: Vec<ObjectId>,
    tree: Tree,
}

impl Commit {
    pub fn new(
        message: String,
        timestamp: DateTime<FixedOffset>,
        parents: Vec<ObjectId>,
        tree: Tree,
    ) -> Self {
        Commit {
            message,
            timestamp,
            parents,
            tree,
        }
    }

    /// The root commit every repository starts from: no parents, empty tree,
    /// stamped with the Unix epoch.
    pub fn initial(message: &str) -> Self {
        Commit::new(message.to_string(), epoch(), Vec::new(), Tree::new())
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// First parent, i.e. the branch the commit was made on.
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn blob_for(&self, path: &str) -> Option<&ObjectId> {
        self.tree.get(path)
    }

    pub fn tracks(&self, path: &str) -> bool {
        self.tree.contains_key(path)
    }

    /// Timestamp formatted the way the log presents it.
    ///
    /// # Returns
    ///
    /// String like "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    /// Timestamp for a new commit: `GITLET_COMMIT_DATE` if set and parseable,
    /// the local wall clock otherwise.
    pub fn timestamp_from_env() -> DateTime<FixedOffset> {
        std::env::var(COMMIT_DATE_ENV)
            .ok()
            .and_then(|date_str| {
                DateTime::parse_from_rfc2822(&date_str)
                    .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                    .ok()
            })
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }
}

fn epoch() -> DateTime<FixedOffset> {
    DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset()
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        // One tree entry per line
        if let Some(path) = self.tree.keys().find(|path| path.contains(['\n', '\r'])) {
            anyhow::bail!("tracked path contains a line break: {path:?}");
        }

        let mut lines = vec![format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )];

        lines.extend(self.parents.iter().map(|parent| format!("parent {parent}")));
        lines.extend(
            self.tree
                .iter()
                .map(|(path, oid)| format!("file {oid} {path}")),
        );

        lines.push(String::new());
        lines.push(self.message.clone());

        Ok(frame(self.object_type(), lines.join("\n").as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .context("commit object is not valid UTF-8")?;

        let (header, message) = content
            .split_once("\n\n")
            .context("commit object is missing its message separator")?;

        let mut timestamp = None;
        let mut parents = Vec::new();
        let mut tree = Tree::new();

        for line in header.lines() {
            let (key, value) = line
                .split_once(' ')
                .with_context(|| format!("malformed commit header line: {line}"))?;

            match key {
                "timestamp" => timestamp = Some(parse_timestamp(value)?),
                "parent" => parents.push(ObjectId::try_parse(value.to_string())?),
                "file" => {
                    let (oid, path) = value
                        .split_once(' ')
                        .with_context(|| format!("malformed tree entry: {value}"))?;
                    tree.insert(path.to_string(), ObjectId::try_parse(oid.to_string())?);
                }
                _ => anyhow::bail!("unknown commit header: {key}"),
            }
        }

        let timestamp = timestamp.context("commit object is missing its timestamp")?;

        Ok(Commit::new(message.to_string(), timestamp, parents, tree))
    }
}

fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, timezone) = value
        .split_once(' ')
        .with_context(|| format!("malformed timestamp: {value}"))?;
    let seconds = seconds
        .parse::<i64>()
        .with_context(|| format!("invalid timestamp seconds: {seconds}"))?;

    let utc = DateTime::from_timestamp(seconds, 0).context("timestamp out of range")?;
    let offset = *DateTime::parse_from_str(
        &format!("1970-01-01 00:00:00 {timezone}"),
        "%Y-%m-%d %H:%M:%S %z",
    )
    .context("invalid timezone")?
    .offset();

    Ok(utc.with_timezone(&offset))
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}

/// Slim representation of a commit
///
/// Contains only what the graph algorithms need: the id and the ordered
/// parent ids.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
}

impl SlimCommit {
    pub fn from_commit(oid: ObjectId, commit: &Commit) -> Self {
        SlimCommit {
            oid,
            parents: commit.parents.clone(),
        }
    }
}
