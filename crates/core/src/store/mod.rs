//! Record store abstraction.
//!
//! All reads and writes of the upload record collection go through [`RecordStore`]. The service
//! holds it as `Arc<dyn RecordStore>`, so the JSON file store used in production and the
//! in-memory store used by tests are interchangeable.
//!
//! Only single-record operations exist. Concurrent updates of the same id are not ordered by the
//! trait; each implementation only guarantees that an individual write is applied atomically.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

use crate::record::{UploadRecord, UploadRecordPatch};
use async_trait::async_trait;
use std::path::PathBuf;
use upload_uuid::FileId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record {0} already exists")]
    DuplicateId(FileId),
    #[error("record {0} does not exist")]
    RecordNotFound(FileId),
    #[error(
        "failed to read collection {path}: {source}",
        path = path.display()
    )]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "failed to write collection {path}: {source}",
        path = path.display()
    )]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize collection: {0}")]
    Serialization(serde_json::Error),
    #[error(
        "collection {path} is corrupt: {source}",
        path = path.display()
    )]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("record store is unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record and return it as stored.
    ///
    /// A failed insert leaves the collection unchanged.
    async fn insert(&self, record: UploadRecord) -> StoreResult<UploadRecord>;

    /// All records with the given id: empty when absent, otherwise exactly one.
    async fn find_by_id(&self, id: &FileId) -> StoreResult<Vec<UploadRecord>>;

    /// Merge `patch` into the stored record identified by `id`.
    async fn update(&self, id: &FileId, patch: UploadRecordPatch) -> StoreResult<()>;
}
