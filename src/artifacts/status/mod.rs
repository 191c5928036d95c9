//! Working tree status inspection
//!
//! Compares the working tree against the current commit and the staging
//! area.
//!
//! ## Components
//!
//! - `file_change`: how an unstaged file differs
//! - `status_info`: the aggregated snapshot

pub mod file_change;
pub mod status_info;
