//! Timeline media storage
//!
//! Files land in the configured upload directory as `<uuid-v4>.<ext>` and are
//! served back under [`PUBLIC_PREFIX`] by a `ServeDir`.

use std::path::Path;

use tracing::{info, warn};
use uuid::Uuid;

use crate::response::ApiError;

/// URL prefix the upload directory is mounted at
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Image and video formats accepted for timeline media
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "heic", "mp4", "mov", "webm",
];

/// Lower-cased extension of an uploaded file, if it is on the allow-list
pub fn media_extension(file_name: &str) -> Result<String, ApiError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ApiError::invalid_upload("Media file has no extension"))?;

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(ApiError::invalid_upload(format!(
            "Unsupported media type .{ext}; allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )))
    }
}

pub fn public_url(stored_name: &str) -> String {
    format!("{PUBLIC_PREFIX}/{stored_name}")
}

/// Stored file name behind a `media_url` we issued; anything else is ignored
pub fn stored_name(media_url: &str) -> Option<&str> {
    let name = media_url.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    valid.then_some(name)
}

/// Write `bytes` under a fresh name and return its public URL
pub async fn store(dir: &Path, ext: &str, bytes: &[u8]) -> Result<String, ApiError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(ApiError::internal)?;

    let name = format!("{}.{ext}", Uuid::new_v4());
    tokio::fs::write(dir.join(&name), bytes)
        .await
        .map_err(ApiError::internal)?;

    info!(file = %name, bytes = bytes.len(), "Stored timeline media");
    Ok(public_url(&name))
}

/// Best-effort delete of a stored upload
pub async fn discard(dir: &Path, media_url: &str) {
    let Some(name) = stored_name(media_url) else {
        return;
    };
    if let Err(e) = tokio::fs::remove_file(dir.join(name)).await {
        warn!(error = %e, file = %name, "Failed to delete timeline media");
    }
}
