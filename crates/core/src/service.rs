//! Upload lifecycle operations.
//!
//! [`UploadService`] owns the two operations exposed to clients:
//! - [`UploadService::initiate_upload`] creates the upload target on disk and its metadata record
//! - [`UploadService::query_upload_status`] reconciles the stored size with the size on disk and
//!   returns the record
//!
//! The bytes themselves are written to the target by someone else. Size reconciliation on each
//! status query is what keeps the metadata close to reality without that writer having to notify
//! this service.
//!
//! No per-id locking is done. Two concurrent status queries for the same id may both update the
//! size; the last write wins, and since the file only grows during a normal upload the next query
//! corrects any stale value.

use crate::config::CoreConfig;
use crate::filesystem::UploadFilesystem;
use crate::record::{UploadRecord, UploadRecordPatch};
use crate::store::RecordStore;
use crate::{UploadError, UploadResult};
use api_shared::{InitiateUploadReq, UploadRes};
use chrono::Utc;
use std::sync::Arc;
use upload_types::{FileExtension, NonEmptyText};
use upload_uuid::FileId;

#[derive(Clone)]
pub struct UploadService {
    cfg: Arc<CoreConfig>,
    store: Arc<dyn RecordStore>,
    fs: Arc<dyn UploadFilesystem>,
}

impl UploadService {
    pub fn new(
        cfg: Arc<CoreConfig>,
        store: Arc<dyn RecordStore>,
        fs: Arc<dyn UploadFilesystem>,
    ) -> Self {
        Self { cfg, store, fs }
    }

    /// Announce an upload: create its target file and persist an `initiated` record.
    ///
    /// # Errors
    ///
    /// - [`UploadError::InvalidRequest`] if `fileName` is missing or blank, or `fileExt` is not a
    ///   plain extension. Nothing is created in that case.
    /// - [`UploadError::TargetCreation`] if the target file cannot be created. No record is
    ///   inserted.
    /// - [`UploadError::Store`] if the insert fails. The target file already exists at that point
    ///   and is left in place.
    pub async fn initiate_upload(&self, req: InitiateUploadReq) -> UploadResult<UploadRes> {
        let name = NonEmptyText::new(req.file_name.unwrap_or_default())
            .map_err(|_| UploadError::InvalidRequest("fileName is required".into()))?;
        let ext = FileExtension::new(req.file_ext.unwrap_or_default())
            .map_err(|e| UploadError::InvalidRequest(e.to_string()))?;

        let id = FileId::new();
        let path = id.storage_path(self.cfg.upload_dir(), ext.as_str());

        self.fs
            .create_empty(&path)
            .await
            .map_err(|source| UploadError::TargetCreation {
                path: path.clone(),
                source,
            })?;

        let record = UploadRecord::initiated(
            id,
            name.into_inner(),
            ext.to_string(),
            path.clone(),
            Utc::now(),
        );

        let stored = match self.store.insert(record).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(
                    file_id = %id,
                    path = %path.display(),
                    error = %e,
                    "record insert failed, upload target left without a record"
                );
                return Err(e.into());
            }
        };

        tracing::info!(file_id = %stored.id, name = %stored.name, "upload initiated");
        Ok(stored.to_response())
    }

    /// Return the current state of an upload, first bringing its stored size in line with the
    /// size of the target on disk.
    ///
    /// # Errors
    ///
    /// - [`UploadError::InvalidRequest`] if `file_id` is missing or blank.
    /// - [`UploadError::NotFound`] if no record has that id. Nothing is written.
    /// - [`UploadError::TargetStat`] if the target cannot be inspected.
    /// - [`UploadError::Store`] if the lookup or the size update fails.
    pub async fn query_upload_status(&self, file_id: Option<&str>) -> UploadResult<UploadRes> {
        let file_id = file_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| UploadError::InvalidRequest("fileId is required".into()))?;

        let mut record = self.find_record(file_id).await?;

        let on_disk = self
            .fs
            .stat_size(&record.path)
            .await
            .map_err(|source| UploadError::TargetStat {
                path: record.path.clone(),
                source,
            })?;

        if on_disk != record.size {
            self.store
                .update(&record.id, UploadRecordPatch::size(on_disk))
                .await?;
            tracing::info!(
                file_id = %record.id,
                stored = record.size,
                on_disk,
                "reconciled upload size"
            );
            record.size = on_disk;
        }

        Ok(record.to_response())
    }

    /// Look up the full stored record, storage path included. Not for client responses.
    ///
    /// An id that is not a canonical UUID cannot belong to any record and is reported as
    /// [`UploadError::NotFound`] without touching the store.
    pub async fn find_record(&self, file_id: &str) -> UploadResult<UploadRecord> {
        let id = match FileId::parse(file_id) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!(file_id, error = %e, "status query for malformed id");
                return Err(UploadError::NotFound(file_id.to_string()));
            }
        };

        self.store
            .find_by_id(&id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| UploadError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::LocalFilesystem;
    use crate::store::{InMemoryStore, JsonFileStore};
    use crate::ErrorKind;
    use api_shared::UploadStatus;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// In-memory stand-in for the disk: path -> size.
    #[derive(Default)]
    struct FakeFs {
        files: Mutex<HashMap<PathBuf, u64>>,
        fail_create: AtomicBool,
    }

    impl FakeFs {
        fn set_size(&self, path: &Path, size: u64) {
            self.files.lock().unwrap().insert(path.to_path_buf(), size);
        }

        fn remove(&self, path: &Path) {
            self.files.lock().unwrap().remove(path);
        }

        fn file_count(&self) -> usize {
            self.files.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl UploadFilesystem for FakeFs {
        async fn create_empty(&self, path: &Path) -> io::Result<()> {
            if self.fail_create.load(Ordering::SeqCst) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            self.set_size(path, 0);
            Ok(())
        }

        async fn stat_size(&self, path: &Path) -> io::Result<u64> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .copied()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    struct Harness {
        service: UploadService,
        store: Arc<InMemoryStore>,
        fs: Arc<FakeFs>,
    }

    fn harness() -> Harness {
        let cfg = Arc::new(
            CoreConfig::new(PathBuf::from("/srv/uploads"), PathBuf::from("/srv/db")).unwrap(),
        );
        let store = Arc::new(InMemoryStore::new());
        let fs = Arc::new(FakeFs::default());
        let service = UploadService::new(cfg, store.clone(), fs.clone());
        Harness { service, store, fs }
    }

    fn req(name: Option<&str>, ext: Option<&str>) -> InitiateUploadReq {
        InitiateUploadReq {
            file_name: name.map(Into::into),
            file_ext: ext.map(Into::into),
        }
    }

    async fn stored_path(h: &Harness, id: &str) -> PathBuf {
        h.service.find_record(id).await.unwrap().path
    }

    #[tokio::test]
    async fn test_initiate_creates_record_and_target() {
        let h = harness();

        let res = h
            .service
            .initiate_upload(req(Some("a.png"), Some("png")))
            .await
            .unwrap();

        assert_eq!(res.name, "a.png");
        assert_eq!(res.ext, "png");
        assert_eq!(res.size, 0);
        assert_eq!(res.status, UploadStatus::Initiated);
        assert!(FileId::is_canonical(&res.id));

        let path = stored_path(&h, &res.id).await;
        assert_eq!(path, Path::new("/srv/uploads").join(format!("{}.png", res.id)));
        assert_eq!(h.fs.stat_size(&path).await.unwrap(), 0);
        assert_eq!(h.store.len(), 1);
    }

    #[tokio::test]
    async fn test_initiate_ids_are_unique() {
        let h = harness();
        let mut ids = HashSet::new();

        for _ in 0..50 {
            let res = h
                .service
                .initiate_upload(req(Some("a.png"), Some("png")))
                .await
                .unwrap();
            assert_eq!(res.status, UploadStatus::Initiated);
            assert_eq!(res.size, 0);
            ids.insert(res.id);
        }

        assert_eq!(ids.len(), 50);
    }

    #[tokio::test]
    async fn test_initiate_without_file_name_has_no_side_effects() {
        let h = harness();

        for bad in [req(None, Some("png")), req(Some("   "), Some("png"))] {
            let err = h.service.initiate_upload(bad).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        }

        assert!(h.store.is_empty());
        assert_eq!(h.fs.file_count(), 0);
    }

    #[tokio::test]
    async fn test_initiate_keeps_file_name_as_sent() {
        let h = harness();

        let res = h
            .service
            .initiate_upload(req(Some(" a.png "), Some("png")))
            .await
            .unwrap();

        assert_eq!(res.name, " a.png ");
        assert_eq!(h.service.find_record(&res.id).await.unwrap().name, " a.png ");
    }

    #[tokio::test]
    async fn test_initiate_rejects_traversing_extension() {
        let h = harness();

        let err = h
            .service
            .initiate_upload(req(Some("a.png"), Some("../../etc/passwd")))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(h.store.is_empty());
        assert_eq!(h.fs.file_count(), 0);
    }

    #[tokio::test]
    async fn test_initiate_without_extension_uses_bare_id() {
        let h = harness();

        let res = h
            .service
            .initiate_upload(req(Some("README"), None))
            .await
            .unwrap();

        assert_eq!(res.ext, "");
        let path = stored_path(&h, &res.id).await;
        assert_eq!(path, Path::new("/srv/uploads").join(&res.id));
    }

    #[tokio::test]
    async fn test_initiate_target_creation_failure_inserts_nothing() {
        let h = harness();
        h.fs.fail_create.store(true, Ordering::SeqCst);

        let err = h
            .service
            .initiate_upload(req(Some("a.png"), Some("png")))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::TargetCreation { .. }));
        assert_eq!(err.kind(), ErrorKind::StorageFailure);
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn test_initiate_insert_failure_leaves_orphaned_target() {
        let h = harness();
        h.store.set_unavailable(true);

        let err = h
            .service
            .initiate_upload(req(Some("a.png"), Some("png")))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StorageFailure);
        assert_eq!(h.fs.file_count(), 1);
        h.store.set_unavailable(false);
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn test_query_requires_file_id() {
        let h = harness();

        for missing in [None, Some(""), Some("  ")] {
            let err = h.service.query_upload_status(missing).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        }
    }

    #[tokio::test]
    async fn test_query_unknown_id_is_not_found_without_writes() {
        let h = harness();
        h.service
            .initiate_upload(req(Some("a.png"), Some("png")))
            .await
            .unwrap();
        let writes = h.store.write_count();

        let unknown = FileId::new().to_string();
        for id in [unknown.as_str(), "not-a-uuid"] {
            let err = h.service.query_upload_status(Some(id)).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }

        assert_eq!(h.store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_query_before_any_bytes_returns_initial_payload() {
        let h = harness();
        let created = h
            .service
            .initiate_upload(req(Some("a.png"), Some("png")))
            .await
            .unwrap();
        let writes = h.store.write_count();

        let status = h
            .service
            .query_upload_status(Some(&created.id))
            .await
            .unwrap();

        assert_eq!(status, created);
        assert_eq!(h.store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_query_reconciles_size_and_persists_it() {
        let h = harness();
        let created = h
            .service
            .initiate_upload(req(Some("a.png"), Some("png")))
            .await
            .unwrap();
        let path = stored_path(&h, &created.id).await;
        h.fs.set_size(&path, 1024);
        let writes = h.store.write_count();

        let status = h
            .service
            .query_upload_status(Some(&created.id))
            .await
            .unwrap();

        assert_eq!(status.size, 1024);
        assert_eq!(h.store.write_count(), writes + 1);

        let id = FileId::parse(&created.id).unwrap();
        let stored = h.store.find_by_id(&id).await.unwrap();
        assert_eq!(stored[0].size, 1024);
    }

    #[tokio::test]
    async fn test_repeated_query_without_new_bytes_does_not_write() {
        let h = harness();
        let created = h
            .service
            .initiate_upload(req(Some("a.png"), Some("png")))
            .await
            .unwrap();
        let path = stored_path(&h, &created.id).await;
        h.fs.set_size(&path, 300);

        let first = h
            .service
            .query_upload_status(Some(&created.id))
            .await
            .unwrap();
        let writes = h.store.write_count();
        let second = h
            .service
            .query_upload_status(Some(&created.id))
            .await
            .unwrap();

        assert_eq!(first.size, 300);
        assert_eq!(second.size, 300);
        assert_eq!(h.store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_query_missing_target_is_storage_failure() {
        let h = harness();
        let created = h
            .service
            .initiate_upload(req(Some("a.png"), Some("png")))
            .await
            .unwrap();
        let path = stored_path(&h, &created.id).await;
        h.fs.remove(&path);

        let err = h
            .service
            .query_upload_status(Some(&created.id))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::TargetStat { .. }));
        assert_eq!(err.kind(), ErrorKind::StorageFailure);
    }

    #[tokio::test]
    async fn test_responses_never_carry_path() {
        let h = harness();
        let created = h
            .service
            .initiate_upload(req(Some("a.png"), Some("png")))
            .await
            .unwrap();
        let status = h
            .service
            .query_upload_status(Some(&created.id))
            .await
            .unwrap();

        for res in [created, status] {
            let value = serde_json::to_value(res).unwrap();
            assert!(value.get("path").is_none());
        }
    }

    #[tokio::test]
    async fn test_end_to_end_on_disk() {
        let temp = TempDir::new().unwrap();
        let cfg = Arc::new(
            CoreConfig::new(temp.path().join("uploads"), temp.path().join("database")).unwrap(),
        );
        cfg.ensure_dirs().await.unwrap();
        let store = Arc::new(JsonFileStore::open(cfg.database_dir()).await.unwrap());
        let service = UploadService::new(cfg.clone(), store, Arc::new(LocalFilesystem));

        let created = service
            .initiate_upload(req(Some("a.png"), Some("png")))
            .await
            .unwrap();
        let target = cfg.upload_dir().join(format!("{}.png", created.id));
        assert!(target.is_file());

        std::fs::write(&target, vec![1u8; 1024]).unwrap();
        let status = service
            .query_upload_status(Some(&created.id))
            .await
            .unwrap();
        assert_eq!(status.size, 1024);

        let reopened = JsonFileStore::open(cfg.database_dir()).await.unwrap();
        let id = FileId::parse(&created.id).unwrap();
        let stored = &reopened.find_by_id(&id).await.unwrap()[0];
        assert_eq!(stored.size, 1024);
        assert_eq!(stored.path, target);
    }
}
