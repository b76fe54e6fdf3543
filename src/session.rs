//! Persisted login session.
//!
//! The bearer token lives in a single JSON file written by `login`. It is read
//! once at startup and handed to the backend; nothing else touches the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::User;

/// An authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Load the session file. A missing file means "not logged in".
    pub async fn load(path: &Path) -> Result<Option<Self>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let session: Self = serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::invalid_data(format!("session file {}", path.display()), e)
                })?;
                if session.token.trim().is_empty() {
                    log::warn!("Session file {} has an empty token", path.display());
                    return Ok(None);
                }
                Ok(Some(session))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write the session file atomically (write to temp, then rename).
    ///
    /// On Unix the file is readable by its owner only.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp: PathBuf = path.with_extension("tmp");
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&tmp).await?;
        // A stale temp file keeps its old mode
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .await?;
        }
        file.write_all(&serde_json::to_vec_pretty(self)?).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, path).await?;
        log::debug!("Session saved to {}", path.display());
        Ok(())
    }

    /// Remove the session file. Returns whether a file was removed.
    pub async fn clear(path: &Path) -> Result<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
