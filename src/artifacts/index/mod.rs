//! Staging file format
//!
//! The staging area (pending additions and pending removals) is persisted in
//! `.gitlet/index` between commands.
//!
//! ## File Format (Version 1)
//!
//! ```text
//! Header (16 bytes):
//!   - Signature: "GSTG" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Addition count (4 bytes)
//!   - Removal count (4 bytes)
//!
//! Additions (variable length):
//!   - Blob id (20 bytes, binary)
//!   - Path length (2 bytes) followed by the UTF-8 path
//!
//! Removals (variable length):
//!   - Path length (2 bytes) followed by the UTF-8 path
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```
//!
//! All integers are big-endian.

pub mod checksum;
pub mod index_header;
pub mod staged_entry;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of the staging file header in bytes
pub const HEADER_SIZE: usize = 16;

/// Magic signature identifying staging files
pub const SIGNATURE: &str = "GSTG";

/// Staging file format version
pub const VERSION: u32 = 1;
