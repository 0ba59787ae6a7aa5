use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use upload_core::{CoreConfig, JsonFileStore, LocalFilesystem, UploadService};

/// Main entry point for the upload tracker server
///
/// Serves the REST API (`/requestFileUpload`, `/getFileStatus`, `/health`, Swagger UI) until
/// Ctrl-C is received.
///
/// # Environment Variables
/// - `UPLOAD_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `UPLOAD_DIR`: Directory upload targets are created in (default: "uploads")
/// - `UPLOAD_DATABASE_DIR`: Directory holding the record collection (default: "database")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configured directories are invalid or cannot be created,
/// - the record collection cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("upload_run=info".parse()?)
                .add_directive("upload_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("UPLOAD_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::from_values(
        std::env::var("UPLOAD_DIR").ok(),
        std::env::var("UPLOAD_DATABASE_DIR").ok(),
    )?);
    cfg.ensure_dirs().await?;

    let store = JsonFileStore::open(cfg.database_dir()).await?;
    let upload_dir = cfg.canonical_upload_dir().await;
    tracing::info!(
        "++ Upload targets in {}, records in {}",
        upload_dir.display(),
        store.path().display()
    );

    let uploads = UploadService::new(cfg.clone(), Arc::new(store), Arc::new(LocalFilesystem));
    let app = router(AppState::new(uploads));

    tracing::info!("++ Starting upload tracker REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Upload tracker stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
