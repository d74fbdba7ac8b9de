//! Status document persistence

use crate::errors::{PingerError, Result};
use crate::status::StatusDocument;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Load the previous run's document.
///
/// Never fails: a missing, unreadable or malformed file is treated as an
/// empty document.
pub async fn load_document(path: &Path) -> StatusDocument {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No status document at {}, starting fresh", path.display());
            return StatusDocument::empty();
        }
        Err(e) => {
            warn!("Could not read status document {}: {}", path.display(), e);
            return StatusDocument::empty();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(document) => document,
        Err(e) => {
            warn!("Ignoring malformed status document {}: {}", path.display(), e);
            StatusDocument::empty()
        }
    }
}

/// Replace the document at `path`, creating parent directories as needed.
///
/// The document is written to a sibling temp file first and renamed into
/// place, so readers never observe a half-written file.
pub async fn save_document(path: &Path, document: &StatusDocument) -> Result<()> {
    write_document(path, document)
        .await
        .map_err(|source| PingerError::Persist {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
}

async fn write_document(path: &Path, document: &StatusDocument) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(document)?;
    let tmp = temp_path(path);

    tokio::fs::write(&tmp, json).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    debug!("Persisted {} services to {}", document.services.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
