//! Filesystem capability used by the upload service.
//!
//! The service only ever needs two things from the disk: create an empty upload target and read
//! the current size of one. Keeping them behind [`UploadFilesystem`] lets the reconciliation
//! logic run against fakes in tests.

use async_trait::async_trait;
use std::io;
use std::path::Path;
use tokio::fs;

#[async_trait]
pub trait UploadFilesystem: Send + Sync {
    /// Create the file at `path`, truncating it if it already exists.
    async fn create_empty(&self, path: &Path) -> io::Result<()>;

    /// Current size of the file at `path` in bytes.
    async fn stat_size(&self, path: &Path) -> io::Result<u64>;
}

/// [`UploadFilesystem`] over the local disk via `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

#[async_trait]
impl UploadFilesystem for LocalFilesystem {
    async fn create_empty(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::File::create(path).await?;
        Ok(())
    }

    async fn stat_size(&self, path: &Path) -> io::Result<u64> {
        let metadata = fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            ));
        }
        Ok(metadata.len())
    }
}
