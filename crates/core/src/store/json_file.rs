use super::{RecordStore, StoreError, StoreResult};
use crate::constants::{COLLECTION_TMP_SUFFIX, FILES_COLLECTION};
use crate::record::{UploadRecord, UploadRecordPatch};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use upload_uuid::FileId;

/// Record store backed by a single JSON document per collection.
///
/// The `files` collection lives at `<database_dir>/files.json` as a JSON array of records. The
/// document is loaded once on [`JsonFileStore::open`] and every write rewrites it in full: the new
/// contents go to `files.json.tmp`, are synced, and then renamed over the live file. The in-memory
/// copy only changes after the rename succeeds, so a failed write never leaves a half-applied
/// record behind.
///
/// The store assumes it is the only writer of its directory.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<Vec<UploadRecord>>,
}

impl JsonFileStore {
    /// Open (or create) the `files` collection under `database_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the directory cannot be created, [`StoreError::Read`] if
    /// an existing collection cannot be read, and [`StoreError::Corrupt`] if it is not a valid
    /// array of records.
    pub async fn open(database_dir: &Path) -> StoreResult<Self> {
        fs::create_dir_all(database_dir)
            .await
            .map_err(|source| StoreError::Write {
                path: database_dir.to_path_buf(),
                source,
            })?;

        let path = database_dir.join(format!("{FILES_COLLECTION}.json"));
        let records = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice::<Vec<UploadRecord>>(&bytes).map_err(|source| {
                StoreError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        tracing::debug!(
            path = %path.display(),
            records = records.len(),
            "opened upload record collection"
        );

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// Location of the collection document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &[UploadRecord]) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(records).map_err(StoreError::Serialization)?;
        let tmp = self
            .path
            .with_extension(format!("json.{COLLECTION_TMP_SUFFIX}"));

        if let Err(e) = write_then_swap(&tmp, &self.path, &bytes).await {
            // A failed create leaves nothing to remove.
            let _ = fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }
}

async fn write_then_swap(tmp: &Path, live: &Path, bytes: &[u8]) -> StoreResult<()> {
    let write_err = |source: std::io::Error| StoreError::Write {
        path: tmp.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(tmp).await.map_err(write_err)?;
    file.write_all(bytes).await.map_err(write_err)?;
    file.sync_all().await.map_err(write_err)?;
    drop(file);

    fs::rename(tmp, live)
        .await
        .map_err(|source| StoreError::Write {
            path: live.to_path_buf(),
            source,
        })
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn insert(&self, record: UploadRecord) -> StoreResult<UploadRecord> {
        let mut records = self.records.lock().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }

        let mut next = records.clone();
        next.push(record.clone());
        self.persist(&next).await?;
        *records = next;

        Ok(record)
    }

    async fn find_by_id(&self, id: &FileId) -> StoreResult<Vec<UploadRecord>> {
        let records = self.records.lock().await;
        Ok(records.iter().filter(|r| &r.id == id).cloned().collect())
    }

    async fn update(&self, id: &FileId, patch: UploadRecordPatch) -> StoreResult<()> {
        let mut records = self.records.lock().await;
        let index = records
            .iter()
            .position(|r| &r.id == id)
            .ok_or(StoreError::RecordNotFound(*id))?;

        let mut next = records.clone();
        patch.apply_to(&mut next[index]);
        self.persist(&next).await?;
        *records = next;

        Ok(())
    }
}
