//! Commit history traversal
//!
//! - `rev_list`: lazy first-parent walk used for linear history
//!
//! Full ancestry over every parent edge lives with the merge-base search in
//! [`crate::artifacts::merge::bca_finder`].

pub mod rev_list;
