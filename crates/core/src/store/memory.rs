use super::{RecordStore, StoreError, StoreResult};
use crate::record::{UploadRecord, UploadRecordPatch};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use upload_uuid::FileId;

/// Process-local record store.
///
/// Used as the test double for [`RecordStore`] and for ephemeral runs. It counts committed
/// writes and can be switched into an unavailable state so callers can observe how failures
/// propagate.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<FileId, UploadRecord>>,
    writes: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful inserts and updates so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of stored records. A poisoned lock still reports what it holds.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every subsequent operation fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store switched off".into()));
        }
        Ok(())
    }

    fn read(
        &self,
    ) -> StoreResult<std::sync::RwLockReadGuard<'_, HashMap<FileId, UploadRecord>>> {
        self.records
            .read()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".into()))
    }

    fn write(
        &self,
    ) -> StoreResult<std::sync::RwLockWriteGuard<'_, HashMap<FileId, UploadRecord>>> {
        self.records
            .write()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".into()))
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn insert(&self, record: UploadRecord) -> StoreResult<UploadRecord> {
        self.check_available()?;
        let mut records = self.write()?;
        if records.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        records.insert(record.id, record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    async fn find_by_id(&self, id: &FileId) -> StoreResult<Vec<UploadRecord>> {
        self.check_available()?;
        Ok(self.read()?.get(id).cloned().into_iter().collect())
    }

    async fn update(&self, id: &FileId, patch: UploadRecordPatch) -> StoreResult<()> {
        self.check_available()?;
        let mut records = self.write()?;
        let record = records
            .get_mut(id)
            .ok_or(StoreError::RecordNotFound(*id))?;
        patch.apply_to(record);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
