//! Upload identifier utilities.
//!
//! Every upload is keyed by a random (v4) UUID generated on the server. The identifier is handed
//! to clients, used as the primary key of the metadata record and, together with the extension,
//! forms the name of the file on disk.
//!
//! ## Canonical form
//! Identifiers use the **hyphenated lowercase** representation:
//! - Length: 36
//! - Example: `550e8400-e29b-41d4-a716-446655440000`
//!
//! This is the value produced by `Uuid::new_v4().hyphenated().to_string()`. Externally supplied
//! identifiers must already be canonical; [`FileId::parse`] rejects every other spelling so that
//! one upload can never be addressed through two different strings.
//!
//! ## Storage file name
//! For an identifier `id` and extension `ext` the upload target is `<upload_dir>/<id>.<ext>`, or
//! `<upload_dir>/<id>` when the extension is empty.

mod file_id;

pub use file_id::{FileId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
