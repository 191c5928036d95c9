//! A small content-addressed version-control core.
//!
//! - `areas`: the object store, refs, staging area and working tree, tied
//!   together by [`areas::repository::Repository`]
//! - `artifacts`: object formats, revision parsing, checkout planning and the
//!   merge algorithms
//! - `commands`: the operations, as methods on `Repository`
//! - `errors`: [`errors::GitletError`]

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
