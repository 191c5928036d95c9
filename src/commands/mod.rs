//! Command implementations
//!
//! Organized the way Git organizes them:
//!
//! - `plumbing`: low-level building blocks (writing a commit from the staging area)
//! - `porcelain`: user-facing version control operations (add, commit, merge, ...)

pub mod plumbing;
pub mod porcelain;
