use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, PARENT_REGEX, REF_ALIASES};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::{MIN_ABBREV_LENGTH, OBJECT_ID_LENGTH};
use crate::errors::{GitletError, Result};
use anyhow::Context;

/// A revision naming a commit.
///
/// Supports multiple formats:
/// - `HEAD`, or its alias `@`
/// - Branch names: `master`, `feature/new-feature`
/// - Full or abbreviated commit ids: 4-40 hexadecimal characters, tried when
///   no branch has that name
/// - Parent notation: `<revision>^` (e.g. `master^`, `abc123^`)
/// - Ancestor notation: `<revision>~<n>` (e.g. `HEAD~3`), following first
///   parents only
///
/// # Examples
///
/// ```ignore
/// let rev = Revision::try_parse("master~2")?;
/// let oid = rev.resolve(&repository)?;
/// ```
#[derive(Debug, Clone)]
pub enum Revision {
    /// The commit HEAD designates
    Head,
    /// A branch, or possibly a commit id (decided during resolution)
    Ref(BranchName),
    /// The Nth first-parent ancestor of a revision (e.g. HEAD~3)
    Ancestor(Box<Revision>, usize),
    /// The first parent of a revision (e.g. HEAD^)
    Parent(Box<Revision>),
}

impl Revision {
    pub fn resolve(&self, repository: &Repository) -> Result<ObjectId> {
        match self {
            Revision::Head => repository
                .refs()
                .read_head()?
                .ok_or_else(|| GitletError::NoSuchCommit(HEAD_REF_NAME.to_string())),
            Revision::Ref(name) => Self::resolve_ref(name, repository),
            Revision::Parent(base_revision) => {
                let oid = base_revision.resolve(repository)?;
                Self::resolve_commit_parent(&oid, repository)
            }
            Revision::Ancestor(base_revision, generations) => {
                let mut oid = base_revision.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::resolve_commit_parent(&oid, repository)?;
                }

                Ok(oid)
            }
        }
    }

    fn resolve_ref(name: &BranchName, repository: &Repository) -> Result<ObjectId> {
        let name_str = name.as_ref();

        // Refs win over commit ids when a name could be either
        if repository.refs().branch_exists(name) {
            return repository.refs().read_branch(name);
        }

        if Self::looks_like_oid(name_str) {
            Self::resolve_oid(name_str, repository)
        } else {
            Err(GitletError::NoSuchCommit(name_str.to_string()))
        }
    }

    fn resolve_commit_parent(oid: &ObjectId, repository: &Repository) -> Result<ObjectId> {
        repository
            .database()
            .load_commit(oid)?
            .parent()
            .cloned()
            .ok_or_else(|| GitletError::NoSuchCommit(format!("{}^", oid.to_short_oid())))
    }

    fn resolve_oid(oid_str: &str, repository: &Repository) -> Result<ObjectId> {
        if oid_str.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(oid_str.to_string())?;
            repository.database().load_commit(&oid)?;
            return Ok(oid);
        }

        let mut commit_matches = Vec::new();
        for oid in repository.database().find_objects_by_prefix(oid_str)? {
            if repository.database().get_object_type(&oid)? == ObjectType::Commit {
                commit_matches.push(oid);
            }
        }

        match commit_matches.len() {
            0 => Err(GitletError::NoSuchCommit(oid_str.to_string())),
            1 => Ok(commit_matches.remove(0)),
            _ => Err(GitletError::AmbiguousCommitId {
                prefix: oid_str.to_string(),
                candidates: commit_matches,
            }),
        }
    }

    pub fn try_parse(revision: &str) -> Result<Revision> {
        let parent_regex = regex::Regex::new(PARENT_REGEX)
            .with_context(|| format!("invalid parent regex: {PARENT_REGEX}"))?;
        let ancestor_regex = regex::Regex::new(ANCESTOR_REGEX)
            .with_context(|| format!("invalid ancestor regex: {ANCESTOR_REGEX}"))?;

        if let Some(caps) = parent_regex.captures(revision) {
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Parent(Box::new(base_revision)))
        } else if let Some(caps) = ancestor_regex.captures(revision) {
            let generations: usize = caps[2]
                .parse()
                .map_err(|_| GitletError::InvalidRevision(revision.to_string()))?;
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Ancestor(Box::new(base_revision), generations))
        } else {
            let resolved_name = *REF_ALIASES.get(revision).unwrap_or(&revision);
            if resolved_name == HEAD_REF_NAME {
                return Ok(Revision::Head);
            }

            BranchName::try_parse(resolved_name.to_string())
                .map(Revision::Ref)
                .map_err(|_| GitletError::InvalidRevision(revision.to_string()))
        }
    }

    fn looks_like_oid(s: &str) -> bool {
        s.len() >= MIN_ABBREV_LENGTH
            && s.len() <= OBJECT_ID_LENGTH
            && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}
