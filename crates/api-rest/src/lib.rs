//! # API REST
//!
//! REST API implementation for the upload tracker.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialisation, CORS, status mapping)
//!
//! All upload semantics live in `upload-core`; handlers only translate between HTTP and
//! [`UploadService`].

#![warn(rust_2018_idioms)]

mod error;
mod handlers;

pub use error::ApiError;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use upload_core::UploadService;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub uploads: UploadService,
}

impl AppState {
    pub fn new(uploads: UploadService) -> Self {
        Self { uploads }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::request_file_upload,
        handlers::get_file_status,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::InitiateUploadReq,
        api_shared::UploadRes,
        api_shared::UploadStatus,
        api_shared::ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Build the full REST application: upload routes, health check, Swagger UI and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/requestFileUpload", post(handlers::request_file_upload))
        .route("/getFileStatus", get(handlers::get_file_status))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
