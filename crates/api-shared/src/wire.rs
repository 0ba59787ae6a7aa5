//! Request and response bodies.
//!
//! Field names are camelCase on the wire (`fileName`, `uploadedAt`).

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body of `POST /requestFileUpload`.
///
/// Both fields are optional at the deserialisation level so that a missing `fileName` is
/// reported as a validation error by the core rather than a body parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitiateUploadReq {
    /// Original name of the file the client is about to upload
    #[serde(default)]
    pub file_name: Option<String>,
    /// Extension used to build the server-side file name, with or without a leading dot
    #[serde(default)]
    pub file_ext: Option<String>,
}

/// Query string of `GET /getFileStatus`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FileStatusQuery {
    /// Identifier returned by `POST /requestFileUpload`
    #[serde(default)]
    pub file_id: Option<String>,
}

/// Lifecycle state of an upload.
///
/// Only `initiated` is produced today; `completed` and `failed` would be driven by an
/// end-of-upload signal that does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Initiated,
}

/// Public view of an upload record. The storage path is server-internal and has no field here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRes {
    pub id: String,
    pub name: String,
    pub ext: String,
    /// Bytes observed on disk at the time of the response
    pub size: u64,
    pub status: UploadStatus,
    /// ISO-8601 UTC creation timestamp
    pub uploaded_at: String,
}

/// JSON error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}
