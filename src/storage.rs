// SPDX-License-Identifier: MPL-2.0

//! Media library: persisting captured photos and videos
//!
//! Captures live in the capture cache until the user saves them. Saving copies
//! the file into the user's Pictures or Videos directory under the app's own
//! folder.

use crate::backends::camera::{MediaKind, MediaReference};
use crate::config::Config;
use crate::constants::app_info;
use crate::errors::StorageError;
use futures::future::{self, BoxFuture, FutureExt};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Media store interface used by the capture controller
pub trait MediaStore: Send + Sync {
    /// Ask for access to the media library
    ///
    /// Resolves to `true` if access was granted.
    fn request_permission(&self) -> BoxFuture<'static, bool>;

    /// Whether media library access is currently granted
    fn permission_granted(&self) -> bool;

    /// Persist a captured asset into the library
    ///
    /// Idempotent per reference: persisting the same reference twice yields
    /// the same library path without creating a second copy.
    fn persist_asset(
        &self,
        media: &MediaReference,
    ) -> BoxFuture<'static, Result<PathBuf, StorageError>>;
}

/// Get the default photo library directory (~/Pictures/shutter)
pub fn default_photo_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(app_info::APP_DIR_NAME)
}

/// Get the default video library directory (~/Videos/shutter)
pub fn default_video_directory() -> PathBuf {
    dirs::video_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Videos")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(app_info::APP_DIR_NAME)
}

#[derive(Default)]
struct LibraryState {
    permission: AtomicBool,
    persisted: Mutex<HashMap<MediaReference, PathBuf>>,
}

/// Filesystem-backed media library
#[derive(Clone)]
pub struct MediaLibrary {
    photo_dir: PathBuf,
    video_dir: PathBuf,
    state: Arc<LibraryState>,
}

impl MediaLibrary {
    pub fn new(photo_dir: impl Into<PathBuf>, video_dir: impl Into<PathBuf>) -> Self {
        Self {
            photo_dir: photo_dir.into(),
            video_dir: video_dir.into(),
            state: Arc::new(LibraryState::default()),
        }
    }

    /// Library using the configured (or default) directories
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config
                .photo_dir
                .clone()
                .unwrap_or_else(default_photo_directory),
            config
                .video_dir
                .clone()
                .unwrap_or_else(default_video_directory),
        )
    }

    /// Library directory for a kind of media
    pub fn directory_for(&self, kind: MediaKind) -> &Path {
        match kind {
            MediaKind::Photo => &self.photo_dir,
            MediaKind::Video => &self.video_dir,
        }
    }
}

impl MediaStore for MediaLibrary {
    fn request_permission(&self) -> BoxFuture<'static, bool> {
        let dirs = [self.photo_dir.clone(), self.video_dir.clone()];
        let state = Arc::clone(&self.state);
        async move {
            let mut granted = true;
            for dir in &dirs {
                if let Err(e) = tokio::fs::create_dir_all(dir).await {
                    warn!(
                        path = %dir.display(),
                        error = %e,
                        "Media library directory not writable"
                    );
                    granted = false;
                }
            }
            state.permission.store(granted, Ordering::SeqCst);
            info!(granted, "Media library permission requested");
            granted
        }
        .boxed()
    }

    fn permission_granted(&self) -> bool {
        self.state.permission.load(Ordering::SeqCst)
    }

    fn persist_asset(
        &self,
        media: &MediaReference,
    ) -> BoxFuture<'static, Result<PathBuf, StorageError>> {
        if !self.permission_granted() {
            return future::ready(Err(StorageError::PermissionDenied)).boxed();
        }

        let media = media.clone();
        let library_dir = self.directory_for(media.kind()).to_path_buf();
        let state = Arc::clone(&self.state);
        async move {
            let already = state
                .persisted
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&media)
                .cloned();
            if let Some(existing) = already
                && tokio::fs::try_exists(&existing).await.unwrap_or(false)
            {
                debug!(path = %existing.display(), "Asset already in library");
                return Ok(existing);
            }

            if !tokio::fs::try_exists(media.path()).await.unwrap_or(false) {
                return Err(StorageError::MissingSource(media.path().to_path_buf()));
            }

            tokio::fs::create_dir_all(&library_dir).await?;
            let destination = library_path(&library_dir, &media);
            tokio::fs::copy(media.path(), &destination).await?;
            info!(
                source = %media.path().display(),
                destination = %destination.display(),
                "Asset added to media library"
            );

            state
                .persisted
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(media, destination.clone());
            Ok(destination)
        }
        .boxed()
    }
}

/// Pick a free `IMG_<timestamp>.<ext>` / `VID_<timestamp>.<ext>` name
fn library_path(dir: &Path, media: &MediaReference) -> PathBuf {
    let extension = media
        .path()
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin")
        .to_lowercase();
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let stem = format!("{}_{}", media.kind().file_prefix(), timestamp);

    let mut candidate = dir.join(format!("{}.{}", stem, extension));
    let mut suffix = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{}_{}.{}", stem, suffix, extension));
        suffix += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("shutter-{}-{}", name, uuid::Uuid::new_v4().simple()))
    }

    #[tokio::test]
    async fn test_persist_requires_permission() {
        let library = MediaLibrary::new(scratch_dir("photos"), scratch_dir("videos"));
        let result = library
            .persist_asset(&MediaReference::photo("/nonexistent.jpg"))
            .await;
        assert_eq!(result, Err(StorageError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_persist_is_idempotent() {
        let source_dir = scratch_dir("source");
        std::fs::create_dir_all(&source_dir).unwrap();
        let source = source_dir.join("capture.jpg");
        std::fs::write(&source, b"jpeg").unwrap();

        let photos = scratch_dir("photos");
        let library = MediaLibrary::new(&photos, scratch_dir("videos"));
        assert!(library.request_permission().await);

        let media = MediaReference::photo(&source);
        let first = library.persist_asset(&media).await.unwrap();
        let second = library.persist_asset(&media).await.unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with(&photos));
        assert!(first.file_name().unwrap().to_string_lossy().starts_with("IMG_"));
        assert_eq!(std::fs::read_dir(&photos).unwrap().count(), 1);

        let _ = std::fs::remove_dir_all(&source_dir);
        let _ = std::fs::remove_dir_all(&photos);
    }

    #[tokio::test]
    async fn test_missing_source() {
        let library = MediaLibrary::new(scratch_dir("photos"), scratch_dir("videos"));
        assert!(library.request_permission().await);
        let missing = scratch_dir("gone").join("capture.jpg");
        let result = library.persist_asset(&MediaReference::photo(&missing)).await;
        assert_eq!(result, Err(StorageError::MissingSource(missing)));
    }
}
