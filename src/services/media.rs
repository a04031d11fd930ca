use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::photo_size::PhotoSize;

/// A local directory of uploaded files.
///
/// Stored paths are relative to `root`. For the rendition store the same
/// relative path is what ends up in `photo_files.file_path` and under the
/// `/media` route; the release store uses a separate, unserved root.
#[derive(Clone, Debug)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn original_name(photo_id: Uuid, extension: &str) -> String {
        format!("photo-{}-{}.{}", photo_id, PhotoSize::Original, extension)
    }

    pub fn derivative_name(photo_id: Uuid, size: &str) -> String {
        format!("photo-{}-{}.jpg", photo_id, size)
    }

    pub fn release_name(photo_id: Uuid, extension: &str) -> String {
        format!("release-{}.{}", photo_id, extension)
    }

    pub async fn ensure_root(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Writes `data` under `relative`, creating parent directories as needed.
    pub async fn put(&self, relative: &str, data: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.resolve(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;
        debug!(path = %path.display(), bytes = data.len(), "media.put");
        Ok(path)
    }

    /// Best-effort removal; a file that is already gone is not an error.
    pub async fn remove(&self, path: &Path) -> bool {
        match fs::remove_file(path).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "media.remove failed");
                false
            }
        }
    }
}
