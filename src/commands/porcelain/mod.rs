//! Porcelain commands (user-facing operations)
//!
//! Each command is an inherent method on [`Repository`](crate::areas::repository::Repository)
//! returning a value for the caller to render; none of them print.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage a file
//! - `rm`: Unstage a file or stage its removal
//! - `commit`: Create a new commit
//! - `status`: Branches, staged changes and working tree state
//! - `log`: First-parent history, every commit, find by message
//! - `branch`: Create, list, or delete branches
//! - `checkout`: Switch branches or restore a file from a commit
//! - `reset`: Move the active branch to a commit
//! - `merge`: Three-way merge of a branch into the active one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
