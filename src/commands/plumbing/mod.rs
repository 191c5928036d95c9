//! Plumbing commands (low-level operations)
//!
//! Building blocks shared by the porcelain commands.
//!
//! ## Commands
//!
//! - `write-commit`: turn the staging area into a commit and move HEAD

mod write_commit;
