//! The persisted upload record and partial updates to it.

use api_shared::{UploadRes, UploadStatus};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use upload_uuid::FileId;

/// Metadata describing one upload attempt, as held by the record store.
///
/// `path` is server-internal. The only way to hand a record to a client is
/// [`UploadRecord::to_response`], which drops it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    pub id: FileId,
    pub name: String,
    pub ext: String,
    pub path: PathBuf,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    pub status: UploadStatus,
}

impl UploadRecord {
    /// Builds the record for a freshly initiated upload: size 0, status `initiated`.
    pub fn initiated(
        id: FileId,
        name: String,
        ext: String,
        path: PathBuf,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            ext,
            path,
            size: 0,
            uploaded_at,
            status: UploadStatus::Initiated,
        }
    }

    pub fn to_response(&self) -> UploadRes {
        UploadRes {
            id: self.id.to_string(),
            name: self.name.clone(),
            ext: self.ext.clone(),
            size: self.size,
            status: self.status,
            uploaded_at: self.uploaded_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Fields that may change after creation. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRecordPatch {
    pub size: Option<u64>,
    pub status: Option<UploadStatus>,
}

impl UploadRecordPatch {
    pub fn size(size: u64) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// Merge the patch into `record`.
    pub fn apply_to(&self, record: &mut UploadRecord) {
        if let Some(size) = self.size {
            record.size = size;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
    }
}
