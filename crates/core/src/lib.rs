//! # Upload Core
//!
//! Core business logic for the upload tracker.
//!
//! This crate owns the upload-record lifecycle:
//! - Announcing an upload: creating its on-disk target and metadata record
//! - Status queries that reconcile the stored size with the real size on disk
//! - The record store abstraction and its JSON-file and in-memory implementations
//!
//! **No API concerns**: HTTP routing, CORS and request parsing belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod filesystem;
pub mod record;
pub mod service;
pub mod store;

pub use api_shared::{InitiateUploadReq, UploadRes, UploadStatus};
pub use config::CoreConfig;
pub use constants::{DEFAULT_DATABASE_DIR, DEFAULT_UPLOAD_DIR};
pub use error::{ErrorKind, UploadError, UploadResult};
pub use filesystem::{LocalFilesystem, UploadFilesystem};
pub use record::{UploadRecord, UploadRecordPatch};
pub use service::UploadService;
pub use store::{InMemoryStore, JsonFileStore, RecordStore, StoreError};
pub use upload_uuid::FileId;
