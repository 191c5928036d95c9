//! Checkout operations
//!
//! Switching the working tree between commits is planned as a
//! [`migration::Migration`] from the current tree to the target tree. The
//! untracked-file check runs on the plan, before any file is touched.

pub mod migration;
