//! Constants used throughout the upload core crate.

/// Default directory for upload targets when no explicit directory is configured.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default directory holding the metadata collections.
pub const DEFAULT_DATABASE_DIR: &str = "database";

/// Name of the collection holding upload records.
pub const FILES_COLLECTION: &str = "files";

/// Suffix of the scratch file a collection is written to before it replaces the live file.
pub const COLLECTION_TMP_SUFFIX: &str = "tmp";
