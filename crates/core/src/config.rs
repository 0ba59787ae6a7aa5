//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. Request
//! handling never reads environment variables or other process-wide state.

use crate::constants::{DEFAULT_DATABASE_DIR, DEFAULT_UPLOAD_DIR};
use crate::{UploadError, UploadResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    upload_dir: PathBuf,
    database_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidConfig`] if either path is empty, is not valid UTF-8, or
    /// points at something that exists but is not a directory. Record paths are stored as JSON
    /// strings, so a directory that cannot be written as one is refused up front.
    pub fn new(upload_dir: PathBuf, database_dir: PathBuf) -> UploadResult<Self> {
        validate_dir("upload_dir", &upload_dir)?;
        validate_dir("database_dir", &database_dir)?;

        Ok(Self {
            upload_dir,
            database_dir,
        })
    }

    /// Build a config from optional values, falling back to the defaults for anything unset or
    /// blank.
    pub fn from_values(
        upload_dir: Option<String>,
        database_dir: Option<String>,
    ) -> UploadResult<Self> {
        fn or_default(value: Option<String>, default: &str) -> PathBuf {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        }

        Self::new(
            or_default(upload_dir, DEFAULT_UPLOAD_DIR),
            or_default(database_dir, DEFAULT_DATABASE_DIR),
        )
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn database_dir(&self) -> &Path {
        &self.database_dir
    }

    /// The upload directory with symlinks and relative components resolved, or as configured if
    /// it cannot be resolved.
    pub async fn canonical_upload_dir(&self) -> PathBuf {
        tokio::fs::canonicalize(&self.upload_dir)
            .await
            .unwrap_or_else(|_| self.upload_dir.clone())
    }

    /// Create both directories if they do not exist yet.
    pub async fn ensure_dirs(&self) -> UploadResult<()> {
        for dir in [&self.upload_dir, &self.database_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| UploadError::DirCreation {
                    path: dir.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}

fn validate_dir(name: &str, path: &Path) -> UploadResult<()> {
    if path.as_os_str().is_empty() {
        return Err(UploadError::InvalidConfig(format!("{name} cannot be empty")));
    }
    if path.to_str().is_none() {
        return Err(UploadError::InvalidConfig(format!(
            "{name} is not valid UTF-8: {}",
            path.display()
        )));
    }
    if path.exists() && !path.is_dir() {
        return Err(UploadError::InvalidConfig(format!(
            "{name} exists but is not a directory: {}",
            path.display()
        )));
    }
    Ok(())
}
