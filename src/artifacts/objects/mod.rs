//! Stored object types
//!
//! Every stored object is identified by the SHA-1 of its serialized form.
//! Two kinds exist:
//!
//! - **Blob**: a file snapshot (raw bytes, no metadata)
//! - **Commit**: message, timestamp, ordered parent ids and the full tree of
//!   tracked paths, each mapped to a blob id
//!
//! On disk all objects share the `<type> <size>\0<content>` framing.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Shortest prefix accepted when resolving abbreviated ids
pub const MIN_ABBREV_LENGTH: usize = 4;
