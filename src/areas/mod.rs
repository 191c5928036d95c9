//! Core repository components
//!
//! - `database`: Object store for blobs and commits
//! - `index`: Staging area for the next commit
//! - `refs`: Branches and HEAD
//! - `repository`: Ties the areas together
//! - `workspace`: Working tree file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
