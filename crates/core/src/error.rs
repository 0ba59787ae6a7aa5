use crate::store::StoreError;
use std::path::PathBuf;

/// Coarse classification of an [`UploadError`], used at the request boundary to pick a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed client input; nothing was changed
    InvalidRequest,
    /// The referenced upload has no record
    NotFound,
    /// The record store or the filesystem failed
    StorageFailure,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("no upload found with id {0}")]
    NotFound(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(
        "failed to create directory {path}: {source}",
        path = path.display()
    )]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "failed to create upload target {path}: {source}",
        path = path.display()
    )]
    TargetCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "failed to read size of upload target {path}: {source}",
        path = path.display()
    )]
    TargetStat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("record store error: {0}")]
    Store(#[from] StoreError),
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            UploadError::NotFound(_) => ErrorKind::NotFound,
            UploadError::InvalidConfig(_)
            | UploadError::DirCreation { .. }
            | UploadError::TargetCreation { .. }
            | UploadError::TargetStat { .. }
            | UploadError::Store(_) => ErrorKind::StorageFailure,
        }
    }
}

pub type UploadResult<T> = std::result::Result<T, UploadError>;
