//! Request handlers for the upload endpoints.

use crate::error::ApiError;
use crate::AppState;
use api_shared::{ErrorRes, FileStatusQuery, HealthRes, HealthService, InitiateUploadReq, UploadRes};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Json,
};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/requestFileUpload",
    request_body = InitiateUploadReq,
    responses(
        (status = 200, description = "Upload initiated", body = UploadRes),
        (status = 400, description = "Missing fileName or unusable body", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Announce an upcoming upload
///
/// Creates the empty upload target and an `initiated` record, and returns the record. The
/// returned `id` is what the client polls `/getFileStatus` with.
///
/// # Errors
/// Returns `400 Bad Request` if the body is not JSON or `fileName` is missing, and
/// `500 Internal Server Error` if the target or record cannot be created.
#[axum::debug_handler]
pub async fn request_file_upload(
    State(state): State<AppState>,
    body: Result<Json<InitiateUploadReq>, JsonRejection>,
) -> Result<Json<UploadRes>, ApiError> {
    let Json(req) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let res = state.uploads.initiate_upload(req).await?;
    Ok(Json(res))
}

#[utoipa::path(
    get,
    path = "/getFileStatus",
    params(FileStatusQuery),
    responses(
        (status = 200, description = "Current upload state", body = UploadRes),
        (status = 400, description = "Missing fileId", body = ErrorRes),
        (status = 404, description = "No upload with that id", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Poll the state of an upload
///
/// The stored size is brought in line with the size of the file on disk before the record is
/// returned.
///
/// # Errors
/// Returns `400 Bad Request` without `fileId`, `404 Not Found` for an unknown id and
/// `500 Internal Server Error` if the upload target cannot be inspected or the record updated.
#[axum::debug_handler]
pub async fn get_file_status(
    State(state): State<AppState>,
    query: Result<Query<FileStatusQuery>, QueryRejection>,
) -> Result<Json<UploadRes>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let res = state
        .uploads
        .query_upload_status(query.file_id.as_deref())
        .await?;
    Ok(Json(res))
}
