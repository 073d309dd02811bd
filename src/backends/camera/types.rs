// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use crate::errors::{AppError, CameraError, PhotoError, RecordingError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which physical camera feeds the viewfinder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraFacing {
    /// Rear (world-facing) camera
    #[default]
    Back,
    /// Front (selfie) camera
    Front,
}

impl CameraFacing {
    /// The other camera
    pub fn flipped(self) -> Self {
        match self {
            CameraFacing::Back => CameraFacing::Front,
            CameraFacing::Front => CameraFacing::Back,
        }
    }
}

impl std::fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraFacing::Back => write!(f, "back"),
            CameraFacing::Front => write!(f, "front"),
        }
    }
}

/// Flash operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlashMode {
    /// Flash LED is off
    #[default]
    Off,
    /// Flash fires during photo capture
    On,
}

impl FlashMode {
    /// Switch between Off and On
    pub fn toggled(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Off,
        }
    }

    /// Whether the flash fires
    pub fn is_on(&self) -> bool {
        matches!(self, FlashMode::On)
    }
}

/// Capture settings pushed to the device whenever the user changes them
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraSettings {
    pub facing: CameraFacing,
    pub flash: FlashMode,
    /// Normalized zoom level in [0.0, 1.0]
    pub zoom: f32,
}

/// Kind of captured media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Filename prefix used when the asset is added to the library
    pub fn file_prefix(&self) -> &'static str {
        match self {
            MediaKind::Photo => "IMG",
            MediaKind::Video => "VID",
        }
    }
}

/// Reference to a just-captured photo or finished recording
///
/// The file lives in the capture cache until the user saves it to the
/// media library or discards it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaReference {
    path: PathBuf,
    kind: MediaKind,
}

impl MediaReference {
    pub fn new(path: impl Into<PathBuf>, kind: MediaKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Reference to a photo
    pub fn photo(path: impl Into<PathBuf>) -> Self {
        Self::new(path, MediaKind::Photo)
    }

    /// Reference to a video
    pub fn video(path: impl Into<PathBuf>) -> Self {
        Self::new(path, MediaKind::Video)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// `file://` URI for display layers
    pub fn uri(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

impl std::fmt::Display for MediaReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Camera access has not been granted
    PermissionDenied,
    /// Backend is not available on this system
    NotAvailable(String),
    /// Camera disconnected or became unresponsive
    Disconnected,
    /// Device is busy with another capture
    Busy,
    /// Recording already in progress
    RecordingInProgress,
    /// No recording in progress
    NoRecordingInProgress,
    /// Encoding the captured frames failed
    EncodingFailed(String),
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::PermissionDenied => write!(f, "Camera permission denied"),
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::Disconnected => write!(f, "Camera disconnected"),
            BackendError::Busy => write!(f, "Camera is busy"),
            BackendError::RecordingInProgress => write!(f, "Recording already in progress"),
            BackendError::NoRecordingInProgress => write!(f, "No recording in progress"),
            BackendError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}

impl From<image::ImageError> for BackendError {
    fn from(err: image::ImageError) -> Self {
        BackendError::EncodingFailed(err.to_string())
    }
}

impl BackendError {
    /// Classify a failed photo capture for the user-facing error channel
    pub fn into_photo_error(self) -> AppError {
        match self {
            BackendError::PermissionDenied => CameraError::PermissionDenied.into(),
            BackendError::Disconnected => CameraError::Disconnected.into(),
            BackendError::Busy => CameraError::Busy.into(),
            BackendError::EncodingFailed(msg) => PhotoError::EncodingFailed(msg).into(),
            other => PhotoError::CaptureFailed(other.to_string()).into(),
        }
    }

    /// Classify a failed recording start for the user-facing error channel
    pub fn into_record_start_error(self) -> AppError {
        match self {
            BackendError::PermissionDenied => CameraError::PermissionDenied.into(),
            BackendError::RecordingInProgress => RecordingError::AlreadyRecording.into(),
            other => RecordingError::StartFailed(other.to_string()).into(),
        }
    }

    /// Classify a failed recording stop for the user-facing error channel
    pub fn into_record_stop_error(self) -> AppError {
        match self {
            BackendError::NoRecordingInProgress => RecordingError::NotRecording.into(),
            other => RecordingError::StopFailed(other.to_string()).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_flip_is_involution() {
        for facing in [CameraFacing::Back, CameraFacing::Front] {
            assert_ne!(facing.flipped(), facing);
            assert_eq!(facing.flipped().flipped(), facing);
        }
    }

    #[test]
    fn test_media_reference_uri() {
        let media = MediaReference::photo("/tmp/shot.jpg");
        assert_eq!(media.uri(), "file:///tmp/shot.jpg");
        assert_eq!(media.kind(), MediaKind::Photo);
    }

    #[test]
    fn test_backend_error_classification() {
        assert!(matches!(
            BackendError::PermissionDenied.into_photo_error(),
            AppError::Camera(CameraError::PermissionDenied)
        ));
        assert!(matches!(
            BackendError::IoError("disk".into()).into_photo_error(),
            AppError::Photo(PhotoError::CaptureFailed(_))
        ));
        assert!(matches!(
            BackendError::RecordingInProgress.into_record_start_error(),
            AppError::Recording(RecordingError::AlreadyRecording)
        ));
    }
}
