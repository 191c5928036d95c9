use crate::areas::refs::HEAD_REF_NAME;
use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use crate::errors::{GitletError, Result};
use anyhow::Context;
use derive_new::new;

const REF_PREFIX: &str = "refs/heads/";

/// A ref path relative to the metadata directory, e.g. `HEAD` or
/// `refs/heads/master`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, new)]
pub struct SymRefName(String);

impl SymRefName {
    pub fn for_branch(branch_name: &BranchName) -> Self {
        SymRefName(format!("{REF_PREFIX}{branch_name}"))
    }

    pub fn as_ref_path(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    /// Validate `name` against git's ref rules. `HEAD` is reserved.
    pub fn try_parse(name: String) -> Result<Self> {
        if name.is_empty() || name == HEAD_REF_NAME {
            return Err(GitletError::InvalidBranchName(name));
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) {
            Err(GitletError::InvalidBranchName(name))
        } else {
            Ok(Self(name))
        }
    }

    /// Branch a symbolic ref points at, `None` for `HEAD` itself.
    pub fn from_sym_ref_name(sym_ref_name: &SymRefName) -> Option<Self> {
        sym_ref_name
            .0
            .strip_prefix(REF_PREFIX)
            .and_then(|name| Self::try_parse(name.to_string()).ok())
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
